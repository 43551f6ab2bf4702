#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    path: &'static str,
}

impl TestCase {
    pub const fn new(name: &'static str, group: TestGroup, path: &'static str) -> Self {
        Self { name, group, path }
    }

    pub const fn matched(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Matched, path)
    }

    pub const fn unmatched(name: &'static str, path: &'static str) -> Self {
        Self::new(name, TestGroup::Unmatched, path)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

/// Whether the benchmarked path hits a registered route or falls through to a scope.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Matched,
    Unmatched,
}

/// Route patterns shaped like a small REST api.
pub const ROUTES: &[&str] = &[
    "/",
    "/health",
    "/users",
    "/users/:id",
    "/users/:id/posts",
    "/users/:id/posts/:post",
    "/teams/:team/members/:member",
    "/static/*",
];
