/// Traversal context for reconstructing member paths.
///
/// `containers` holds the dotted path segments of the object literals and
/// assignments currently being walked. When looking at `c` in
/// `a.b = { c: d }` the segments are `["a", "b"]`.
///
/// `depth` counts enclosing function bodies. Paths can only be reconstructed
/// at depth 0; inside a function the code no longer says where a value ends up.
#[derive(Debug, Default)]
pub struct ScopeContext {
    containers: Vec<String>,
    depth: usize,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// True at module level (outside every function body).
    pub fn is_top_level(&self) -> bool {
        self.depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter_function(&mut self) {
        self.depth += 1;
    }

    pub fn exit_function(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Push container segments. Returns how many were pushed, to be handed
    /// back to [`pop_containers`](Self::pop_containers) on the way up.
    pub fn push_containers<I, S>(&mut self, segments: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.containers.len();
        self.containers.extend(segments.into_iter().map(Into::into));
        self.containers.len() - before
    }

    pub fn pop_containers(&mut self, count: usize) {
        let keep = self.containers.len().saturating_sub(count);
        self.containers.truncate(keep);
    }

    /// The dotted path of the current container, empty at the outermost level.
    pub fn container_path(&self) -> String {
        self.containers.join(".")
    }

    /// Prefix `path` with the current container path.
    pub fn qualify(&self, path: &str) -> String {
        if self.containers.is_empty() {
            path.to_string()
        } else {
            format!("{}.{}", self.container_path(), path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_depth() {
        let mut scope = ScopeContext::new();
        assert!(scope.is_top_level());
        scope.enter_function();
        scope.enter_function();
        assert_eq!(scope.depth(), 2);
        scope.exit_function();
        scope.exit_function();
        assert!(scope.is_top_level());
        scope.exit_function();
        assert_eq!(scope.depth(), 0);
    }

    #[test]
    fn test_containers_push_and_pop() {
        let mut scope = ScopeContext::new();
        assert_eq!(scope.qualify("x"), "x");

        let outer = scope.push_containers(["a", "b"]);
        let inner = scope.push_containers(["c"]);
        assert_eq!(scope.container_path(), "a.b.c");
        assert_eq!(scope.qualify("x"), "a.b.c.x");

        scope.pop_containers(inner);
        assert_eq!(scope.container_path(), "a.b");
        scope.pop_containers(outer);
        assert_eq!(scope.container_path(), "");
    }
}
