use super::*;

#[test]
fn test_root_handle_is_zero() {
  assert_eq!(NodeHandle::ROOT.index(), 0);
  assert_eq!(NodeHandle::from_index(0), NodeHandle::ROOT);
}

#[test]
fn test_handle_roundtrip() {
  for index in [1usize, 2, 17, 4096] {
    assert_eq!(NodeHandle::from_index(index).index(), index);
  }
}

#[test]
fn test_leaf_line_is_free_interval() {
  let node = SonarNode::leaf(Line::new(-1.0, 0.5));
  assert!(node.is_leaf());
  assert_eq!(node.line(), Line::new(-1.0, 0.5));
  assert_eq!(node.children(), None);
}

#[test]
fn test_internal_line_is_span() {
  let node = SonarNode::Internal {
    span: Line::new(-2.0, 2.0),
    left: NodeHandle::from_index(1),
    right: NodeHandle::from_index(2),
  };
  assert!(!node.is_leaf());
  assert_eq!(node.line(), Line::new(-2.0, 2.0));
  assert_eq!(
    node.children(),
    Some((NodeHandle::from_index(1), NodeHandle::from_index(2)))
  );
}
