#[derive(Debug, Clone)]
pub struct ClockifyURL(String);

impl AsRef<str> for ClockifyURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ClockifyURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_joins_with_single_slash() {
        let url = ClockifyURL::new("https://api.clockify.me/api/v1/");
        assert_eq!(
            url.append_path("/workspaces").as_ref(),
            "https://api.clockify.me/api/v1/workspaces"
        );
        assert_eq!(
            ClockifyURL::new("http://localhost:8080")
                .append_path("user")
                .as_ref(),
            "http://localhost:8080/user"
        );
    }
}
