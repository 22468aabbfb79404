use super::MarkupElement;

/// Lazy depth-first, pre-order iterator over annotated nodes.
///
/// Every child is visited whether or not its parent was annotated. The walk
/// keeps its own stack, so deeply nested markup cannot overflow the call
/// stack.
#[derive(Debug)]
pub struct TreeWalker<N> {
    stack: Vec<N>,
}

impl<N: MarkupElement> Iterator for TreeWalker<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.child_elements().into_iter().rev());
            if node.node_type().is_some() {
                return Some(node);
            }
        }
        None
    }
}

/// Starts a walk at `root`, which is itself yielded when annotated.
pub fn walk<N: MarkupElement>(root: N) -> TreeWalker<N> {
    TreeWalker { stack: vec![root] }
}
