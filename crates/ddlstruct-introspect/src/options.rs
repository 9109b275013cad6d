/// Options that control how introspection behaves.
#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    /// Also list views when enumerating the tables of a schema.
    pub include_views: bool,
    pub include_comments: bool,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            include_views: true,
            include_comments: true,
        }
    }
}
