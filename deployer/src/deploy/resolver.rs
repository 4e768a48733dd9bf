//! Stack lookup by name

use crate::models::stack::RemoteStack;

/// Find the stack called `name`
///
/// Names are compared exactly. Should several stacks share the name, the
/// first one in listing order wins.
pub fn resolve_stack<'a>(stacks: &'a [RemoteStack], name: &str) -> Option<&'a RemoteStack> {
    stacks.iter().find(|stack| stack.name == name)
}
