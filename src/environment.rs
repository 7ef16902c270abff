pub const DEVELOPMENT: &str = "development";
pub const TEST: &str = "test";

/// Name of the environment the host was started in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    name: String,
}

impl HostEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Environment names compare case-insensitively
    pub fn is_environment(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }

    pub fn is_test(&self) -> bool {
        self.is_environment(TEST)
    }

}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new(DEVELOPMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_environment() {
        let env = HostEnvironment::new("Test");
        assert!(env.is_test());
        assert!(env.is_environment("TEST"));
        assert!(!env.is_environment(DEVELOPMENT));

        let env = HostEnvironment::default();
        assert_eq!(env.name(), DEVELOPMENT);
        assert!(!env.is_test());
        assert!(!env.is_environment("production"));
    }
}
