use super::*;

fn leaf() -> Node {
    Node::new_leaf(Arc::new(SimpleStorageService::new(1_000)))
}

#[test]
fn leaf_node_reports_storage_and_no_children() {
    let node = leaf();
    assert!(node.is_leaf());
    assert!(!node.is_supervisor());
    assert!(node.storage().is_some());
}

#[test]
fn supervisor_node_has_no_storage() {
    let node = Node::new_supervisor();
    assert!(!node.is_leaf());
    assert!(node.storage().is_none());
}

#[test]
fn children_are_returned_in_insertion_order() {
    let node = Node::new_supervisor();
    let a = NodeId::new();
    let b = NodeId::new();
    let c = NodeId::new();
    node.add_child(a);
    node.add_child(b);
    node.add_child(c);
    assert_eq!(node.get_child(0), Some(a));
    assert_eq!(node.get_child(1), Some(b));
    assert_eq!(node.get_child(2), Some(c));
    assert_eq!(node.get_child(3), None);
    assert!(node.is_supervisor());
}

#[test]
fn parent_link_round_trips() {
    let node = Node::new_supervisor();
    assert_eq!(node.parent(), None);
    let parent = NodeId::new();
    node.set_parent(parent);
    assert_eq!(node.parent(), Some(parent));
}

#[test]
fn storage_supervisor_is_both_leaf_and_supervisor() {
    let node = Node::new_storage_supervisor(Arc::new(SimpleStorageService::new(1_000)));
    node.add_child(NodeId::new());
    assert!(node.is_leaf());
    assert!(node.is_supervisor());
}
