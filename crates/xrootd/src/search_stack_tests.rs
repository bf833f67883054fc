use super::*;

fn path_of(n: usize) -> Vec<NodeId> {
    (0..n).map(|_| NodeId::new()).collect()
}

#[test]
fn fresh_stack_starts_at_the_head() {
    let path = path_of(3);
    let stack = SearchStack::new(path.clone(), FileId::new());
    assert!(stack.at_start());
    assert_eq!(stack.peek(), Some(path[0]));
    assert_eq!(stack.head_node(), Some(path[0]));
    assert_eq!(stack.terminal_node(), Some(path[2]));
}

#[test]
fn move_down_advances_the_cursor_until_the_end() {
    let path = path_of(3);
    let mut stack = SearchStack::new(path.clone(), FileId::new());
    assert_eq!(stack.move_down(), Some(path[1]));
    assert_eq!(stack.move_down(), Some(path[2]));
    assert!(stack.at_end());
    assert_eq!(stack.move_down(), None);
}

#[test]
fn move_up_retreats_the_cursor_until_the_start() {
    let path = path_of(3);
    let mut stack = SearchStack::new(path.clone(), FileId::new());
    stack.move_down();
    stack.move_down();
    assert_eq!(stack.move_up(), Some(path[1]));
    assert_eq!(stack.move_up(), Some(path[0]));
    assert!(stack.at_start());
    assert_eq!(stack.move_up(), None);
}

#[test]
fn in_tree_checks_membership_on_the_current_path() {
    let path = path_of(2);
    let stack = SearchStack::new(path.clone(), FileId::new());
    assert!(stack.in_tree(path[0]));
    assert!(!stack.in_tree(NodeId::new()));
}

#[test]
fn push_extends_the_path_and_moves_the_terminal() {
    let mut path = path_of(1);
    let mut stack = SearchStack::new(path.clone(), FileId::new());
    let extra = NodeId::new();
    stack.push(extra);
    path.push(extra);
    assert_eq!(stack.terminal_node(), Some(extra));
}
