//! Tests for the tree reconciler against the arena scene graph

use rstest::rstest;

use matrix_tree::domain::reconciler::{
    BRANCH_CLASS, INDENT_PROPERTY, LEAF_CLASS, ROOT_CLASS, ROOT_TAG, ROW_CLASS, ROW_TAG,
};
use matrix_tree::domain::{
    visual_transform, ArenaScene, CategoryViewModel, DataView, DataViewMatrix, LabelMode, NodeId,
    RawMatrixNode, RawMatrixValue, ReconcileStats, RenderOptions, SceneGraph, Selector,
    TreeReconciler, VisualViewModel,
};
use matrix_tree::util::testing::init_test_setup;

// ============================================================
// Helpers
// ============================================================

fn leaf(name: &str, measures: &[(&str, f64)]) -> RawMatrixNode {
    RawMatrixNode::terminal(
        name,
        measures
            .iter()
            .map(|(k, v)| (k.to_string(), RawMatrixValue::new(*v))),
    )
}

fn view_model(children: Vec<RawMatrixNode>) -> VisualViewModel {
    let views = vec![DataView::with_matrix(DataViewMatrix::from_root(
        RawMatrixNode::category("root", children),
    ))];
    visual_transform(Some(&views))
}

/// A -> [A1 {m1:5}], B (no children, no values)
fn example_view_model() -> VisualViewModel {
    view_model(vec![
        RawMatrixNode::category("A", vec![leaf("A1", &[("m1", 5.0)])]),
        RawMatrixNode {
            value: Some("B".into()),
            ..RawMatrixNode::default()
        },
    ])
}

fn row_selector() -> Selector<'static> {
    Selector::element(ROW_TAG).class(ROW_CLASS)
}

fn root_of(scene: &ArenaScene) -> Option<NodeId> {
    scene
        .select_children(scene.container(), Selector::element(ROOT_TAG).class(ROOT_CLASS))
        .unwrap()
        .first()
        .copied()
}

fn rows(scene: &ArenaScene, parent: NodeId) -> Vec<NodeId> {
    scene.select_children(parent, row_selector()).unwrap()
}

fn reconcile(scene: &mut ArenaScene, vm: &VisualViewModel) {
    TreeReconciler::default().reconcile(scene, vm).unwrap();
}

/// Every row's indentation equals `step × level`, where level is its row depth.
fn assert_indentation(scene: &ArenaScene, parent: NodeId, level: u32, step: u32) {
    for row in rows(scene, parent) {
        let expected = format!("{}px", level * step);
        assert_eq!(
            scene.node(row).unwrap().style(INDENT_PROPERTY),
            Some(expected.as_str()),
            "row '{}' at level {}",
            scene.text_content(row),
            level
        );
        assert_indentation(scene, row, level + 1, step);
    }
}

// ============================================================
// Structure
// ============================================================

#[test]
fn given_example_matrix_when_reconciling_then_renders_two_branches_and_one_leaf() {
    // Arrange
    init_test_setup();
    let mut scene = ArenaScene::new();
    let vm = example_view_model();

    // Act
    let stats = TreeReconciler::default().reconcile(&mut scene, &vm).unwrap();

    // Assert
    let root = root_of(&scene).expect("root rendered");
    let top = rows(&scene, root);
    assert_eq!(top.len(), 2);
    for row in &top {
        assert!(scene.node(*row).unwrap().has_class(BRANCH_CLASS));
    }

    let a_rows = rows(&scene, top[0]);
    assert_eq!(a_rows.len(), 1);
    assert!(scene.node(a_rows[0]).unwrap().has_class(LEAF_CLASS));
    assert_eq!(scene.text_content(a_rows[0]), "A1 Measures: 5|");

    assert!(rows(&scene, top[1]).is_empty());
    assert_eq!(scene.text_content(top[1]), "B");

    assert_eq!(stats.created, 3);
    assert_eq!(stats.branch_rows, 2);
    assert_eq!(stats.leaf_rows, 1);
}

#[test]
fn given_matrix_with_n_leaves_when_reconciling_then_renders_n_leaf_rows() {
    // Arrange
    let vm = view_model(vec![
        RawMatrixNode::category(
            "A",
            vec![
                RawMatrixNode::category(
                    "A1",
                    vec![leaf("A1a", &[("m", 1.0)]), leaf("A1b", &[("m", 2.0)])],
                ),
                leaf("A2", &[("m", 3.0)]),
            ],
        ),
        leaf("B", &[("m", 4.0), ("n", 5.0)]),
    ]);
    let mut scene = ArenaScene::new();

    // Act
    reconcile(&mut scene, &vm);

    // Assert
    let leaves = Selector::element(ROW_TAG).class(LEAF_CLASS);
    assert_eq!(scene.count(leaves), vm.leaf_count());
    assert_eq!(scene.count(leaves), 4);

    fn assert_structure(scene: &ArenaScene, parent: NodeId, data: &[CategoryViewModel]) {
        let children = rows(scene, parent);
        assert_eq!(children.len(), data.len());
        for (row, category) in children.iter().zip(data) {
            assert_structure(scene, *row, &category.children);
        }
    }
    assert_structure(&scene, root_of(&scene).unwrap(), vm.categories());
}

#[test]
fn given_reordered_data_when_reconciling_then_relabels_nodes_in_place() {
    // Arrange
    let mut scene = ArenaScene::new();
    reconcile(
        &mut scene,
        &view_model(vec![leaf("A", &[("m", 1.0)]), leaf("B", &[("m", 2.0)])]),
    );
    let before = rows(&scene, root_of(&scene).unwrap());

    // Act
    let stats = TreeReconciler::default()
        .reconcile(
            &mut scene,
            &view_model(vec![leaf("B", &[("m", 2.0)]), leaf("A", &[("m", 1.0)])]),
        )
        .unwrap();

    // Assert
    let after = rows(&scene, root_of(&scene).unwrap());
    assert_eq!(before, after, "positional identity keeps the same nodes");
    assert_eq!(scene.text_content(after[0]), "B Measures: 2|");
    assert_eq!(scene.text_content(after[1]), "A Measures: 1|");
    assert_eq!(stats.created, 0);
    assert_eq!(stats.removed, 0);
    assert_eq!(stats.reused, 2);
}

// ============================================================
// Indentation
// ============================================================

#[test]
fn given_nested_rows_when_reconciling_then_indent_is_twenty_per_level_on_every_pass() {
    // Arrange
    let mut scene = ArenaScene::new();
    let first = view_model(vec![RawMatrixNode::category(
        "A",
        vec![RawMatrixNode::category("A1", vec![leaf("A1a", &[("m", 1.0)])])],
    )]);
    // A1 turns into a leaf, a new branch A2 appears below A
    let second = view_model(vec![RawMatrixNode::category(
        "A",
        vec![
            leaf("A1", &[("m", 1.0)]),
            RawMatrixNode::category("A2", vec![leaf("A2a", &[("m", 2.0)])]),
        ],
    )]);

    // Act / Assert
    reconcile(&mut scene, &first);
    assert_indentation(&scene, root_of(&scene).unwrap(), 1, 20);

    reconcile(&mut scene, &second);
    assert_indentation(&scene, root_of(&scene).unwrap(), 1, 20);
}

// ============================================================
// Repeated passes
// ============================================================

#[test]
fn given_identical_data_when_reconciling_twice_then_node_count_is_stable() {
    // Arrange
    let mut scene = ArenaScene::new();
    let vm = example_view_model();

    // Act
    reconcile(&mut scene, &vm);
    let after_first = scene.len();
    let stats = TreeReconciler::default().reconcile(&mut scene, &vm).unwrap();

    // Assert
    assert_eq!(scene.len(), after_first);
    assert_eq!(stats.created, 0);
    assert_eq!(stats.removed, 0);
    let a = rows(&scene, root_of(&scene).unwrap())[0];
    assert_eq!(scene.text_content(rows(&scene, a)[0]), "A1 Measures: 5|");
}

#[test]
fn given_identical_data_when_reconciling_twice_then_scene_is_unchanged() {
    // Arrange
    let mut scene = ArenaScene::new();
    let vm = example_view_model();
    reconcile(&mut scene, &vm);
    let first = scene.snapshot();

    // Act
    reconcile(&mut scene, &vm);

    // Assert
    assert_eq!(scene.snapshot(), first);
}

#[test]
fn given_reused_branch_when_reconciling_then_label_precedes_nested_rows() {
    // Arrange
    let mut scene = ArenaScene::new();
    reconcile(&mut scene, &example_view_model());

    // Act
    reconcile(&mut scene, &example_view_model());

    // Assert
    let a = rows(&scene, root_of(&scene).unwrap())[0];
    let children = &scene.node(a).unwrap().children;
    assert_eq!(children.len(), 2);
    assert_eq!(scene.node(children[0]).unwrap().text_value(), Some("A"));
    assert_eq!(children[1], rows(&scene, a)[0]);
}

#[test]
fn given_append_label_mode_when_reconciling_twice_then_labels_accumulate() {
    // Arrange
    let mut scene = ArenaScene::new();
    let vm = view_model(vec![leaf("A", &[("m", 1.0)])]);
    let reconciler = TreeReconciler::new(RenderOptions {
        label_mode: LabelMode::Append,
        ..RenderOptions::default()
    });

    // Act
    reconciler.reconcile(&mut scene, &vm).unwrap();
    reconciler.reconcile(&mut scene, &vm).unwrap();

    // Assert
    let a = rows(&scene, root_of(&scene).unwrap())[0];
    assert_eq!(scene.text_content(a), "A Measures: 1| A Measures: 1|");
}

#[test]
fn given_changed_measures_when_reconciling_then_leaf_shows_only_current_values() {
    // Arrange
    let mut scene = ArenaScene::new();
    reconcile(&mut scene, &view_model(vec![leaf("A", &[("m1", 1.0), ("m2", 2.0)])]));

    // Act
    reconcile(&mut scene, &view_model(vec![leaf("A", &[("m1", 7.0)])]));

    // Assert
    let a = rows(&scene, root_of(&scene).unwrap())[0];
    assert_eq!(scene.text_content(a), "A Measures: 7|");
}

#[rstest]
#[case(4, 1)]
#[case(4, 3)]
#[case(3, 0)]
#[case(2, 2)]
fn given_shrinking_siblings_when_reconciling_then_removes_trailing_rows_only(
    #[case] before: usize,
    #[case] removed: usize,
) {
    // Arrange
    let category = |i: usize| {
        RawMatrixNode::category(
            format!("C{i}").as_str(),
            vec![leaf(&format!("C{i}-leaf"), &[("m", i as f64)])],
        )
    };
    let mut scene = ArenaScene::new();
    reconcile(&mut scene, &view_model((0..before).map(category).collect()));
    let root = root_of(&scene).unwrap();
    let old_rows = rows(&scene, root);
    let old_leaves: Vec<NodeId> = old_rows.iter().map(|r| rows(&scene, *r)[0]).collect();

    // Act
    let stats = TreeReconciler::default()
        .reconcile(&mut scene, &view_model((0..before - removed).map(category).collect()))
        .unwrap();

    // Assert
    let new_rows = rows(&scene, root);
    assert_eq!(new_rows.len(), before - removed);
    assert_eq!(new_rows[..], old_rows[..before - removed]);
    for (i, row) in new_rows.iter().enumerate() {
        let leaf_rows = rows(&scene, *row);
        assert_eq!(leaf_rows, vec![old_leaves[i]], "subtree of C{i} kept intact");
        assert_eq!(scene.text_content(*row), format!("C{i}"));
    }
    for gone in &old_rows[before - removed..] {
        assert!(!scene.contains(*gone));
    }
    assert_eq!(stats.removed, removed);
    assert_eq!(stats.created, 0);
}

#[test]
fn given_growing_siblings_when_reconciling_then_appends_new_rows() {
    // Arrange
    let mut scene = ArenaScene::new();
    reconcile(&mut scene, &view_model(vec![leaf("A", &[("m", 1.0)])]));
    let a = rows(&scene, root_of(&scene).unwrap())[0];

    // Act
    let stats = TreeReconciler::default()
        .reconcile(
            &mut scene,
            &view_model(vec![leaf("A", &[("m", 1.0)]), leaf("B", &[("m", 2.0)])]),
        )
        .unwrap();

    // Assert
    let top = rows(&scene, root_of(&scene).unwrap());
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], a);
    assert_eq!(scene.text_content(top[1]), "B Measures: 2|");
    assert_eq!(stats.created, 1);
    assert_eq!(stats.reused, 1);
}

// ============================================================
// Missing data
// ============================================================

#[test]
fn given_rendered_tree_when_data_disappears_then_root_is_removed() {
    // Arrange
    let mut scene = ArenaScene::new();
    reconcile(&mut scene, &example_view_model());
    assert!(!scene.is_empty());

    // Act
    let stats = TreeReconciler::default()
        .reconcile(&mut scene, &VisualViewModel::Empty)
        .unwrap();

    // Assert
    assert!(root_of(&scene).is_none());
    assert!(scene.is_empty());
    assert_eq!(stats.removed, 1);
}

#[test]
fn given_foreign_content_when_data_is_empty_then_only_root_is_removed() {
    // Arrange
    let mut scene = ArenaScene::new();
    let container = scene.container();
    let foreign = scene.append_element(container, "span").unwrap();
    reconcile(&mut scene, &example_view_model());

    // Act
    reconcile(&mut scene, &VisualViewModel::Empty);

    // Assert
    assert!(scene.contains(foreign));
    assert!(root_of(&scene).is_none());
}

#[test]
fn given_empty_scene_when_data_is_empty_then_nothing_changes() {
    let mut scene = ArenaScene::new();

    let stats = TreeReconciler::default()
        .reconcile(&mut scene, &VisualViewModel::Empty)
        .unwrap();

    assert_eq!(scene.len(), 1);
    assert_eq!(stats, ReconcileStats::default());
}

#[test]
fn given_matrix_without_categories_when_reconciling_then_renders_bare_root() {
    let mut scene = ArenaScene::new();

    reconcile(&mut scene, &view_model(vec![]));

    let root = root_of(&scene).expect("root rendered");
    assert!(rows(&scene, root).is_empty());
}
