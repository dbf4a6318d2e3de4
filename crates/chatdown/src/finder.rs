//! Shadow-DOM-aware element search.
//!
//! A plain `querySelectorAll` stops at shadow boundaries. The deep search
//! scans the root's light tree, then visits every shadow root hosted by an
//! element of that tree and scans it the same way, however deep the nesting.
//!
//! Results are ordered per scope, not globally: the root's matches first (in
//! document order), then one block per shadow root in the order its host was
//! met, each block followed by the blocks of its own nested shadow roots.

use crate::node::Node;
use crate::selector::Selector;

/// Find every element matching `selector` under `root`, across shadow trees.
///
/// `root` itself is neither matched nor treated as a shadow host.
pub fn deep_query_selector_all<'a>(root: &'a Node, selector: &Selector) -> Vec<&'a Node> {
    let mut results = Vec::new();
    let mut scopes: Vec<(&'a Node, usize)> = vec![(root, 0)];
    let mut shadow_scopes = 0usize;

    while let Some((scope, depth)) = scopes.pop() {
        let mut nested = Vec::new();
        for element in scope.descendants() {
            if selector.matches(element) {
                results.push(element);
            }
            nested.extend(element.shadow_roots().map(|shadow| (shadow, depth + 1)));
        }
        shadow_scopes += nested.len();
        // First host's shadow root on top of the stack
        scopes.extend(nested.into_iter().rev());
    }

    tracing::debug!(
        selector = %selector,
        matches = results.len(),
        shadow_scopes,
        "Deep selector query finished"
    );
    results
}

/// Find the first element matching `selector`, in the same order as
/// [`deep_query_selector_all`].
pub fn deep_query_selector<'a>(root: &'a Node, selector: &Selector) -> Option<&'a Node> {
    deep_query_selector_all(root, selector).into_iter().next()
}
