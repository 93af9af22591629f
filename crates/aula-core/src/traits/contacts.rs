/// Contact directory keyed by topic.
pub trait IContactDirectory: Send + Sync {
    /// Emails for `topic`, best first. Empty when the topic is unknown.
    fn lookup(&self, topic: &str) -> Vec<String>;
}
