//! Console report printed on stdout

use database::mongodb::{ProbeEvent, ProbeStep};
use std::fmt::Display;
use std::io::{self, Write};

/// Troubleshooting hints, printed on every failure regardless of cause
pub fn troubleshooting_hints(username: Option<&str>) -> [String; 4] {
    let user_hint = match username {
        Some(user) => format!("Ensure database user '{}' exists with correct permissions", user),
        None => "Ensure the database user in the connection string exists with correct permissions"
            .to_string(),
    };

    [
        "Check if the MongoDB cluster is running".to_string(),
        "Verify network access allows this host's IP address".to_string(),
        user_hint,
        "Verify connection string format".to_string(),
    ]
}

pub struct Report<W> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn started(&mut self, redacted_url: &str) -> io::Result<()> {
        writeln!(self.out, "🔍 Testing MongoDB connection...")?;
        writeln!(self.out, "Connection string: {}", redacted_url)?;
        writeln!(self.out, "📋 Listing databases...")
    }

    pub fn event(&mut self, event: &ProbeEvent<'_>) -> io::Result<()> {
        match event {
            ProbeEvent::DatabasesListed(names) => {
                writeln!(self.out, "Available databases: {:?}", names)
            }
            ProbeEvent::Written(id) => writeln!(self.out, "✅ Write test successful: {}", id),
            ProbeEvent::ReadBack(document) => {
                writeln!(self.out, "✅ Read test successful: {}", document)
            }
            ProbeEvent::CleanedUp(_) => writeln!(self.out, "✅ Cleanup successful"),
        }
    }

    pub fn passed(&mut self) -> io::Result<()> {
        writeln!(self.out, "🎉 MongoDB connection test PASSED!")?;
        self.out.flush()
    }

    pub fn failed(
        &mut self,
        error: &dyn Display,
        step: Option<ProbeStep>,
        username: Option<&str>,
    ) -> io::Result<()> {
        match step {
            Some(step) => writeln!(
                self.out,
                "❌ MongoDB connection test FAILED during {}: {}",
                step, error
            )?,
            None => writeln!(self.out, "❌ MongoDB connection test FAILED: {}", error)?,
        }

        writeln!(self.out)?;
        writeln!(self.out, "🔧 Troubleshooting steps:")?;
        for (i, hint) in troubleshooting_hints(username).iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, hint)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::mongodb::ProbeError;

    fn rendered(report: Report<Vec<u8>>) -> String {
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn test_hints_use_username() {
        let hints = troubleshooting_hints(Some("ops-admin"));
        assert_eq!(hints.len(), 4);
        assert!(hints[2].contains("'ops-admin'"));
    }

    #[test]
    fn test_hints_without_username() {
        let hints = troubleshooting_hints(None);
        assert!(hints[2].contains("in the connection string"));
    }

    #[test]
    fn test_success_output_has_marker_per_step() {
        let mut report = Report::new(Vec::new());
        let names = vec!["admin".to_string(), "local".to_string()];
        let document = database::mongodb::ProbeDocument::new().to_document();

        report.started("mongodb://localhost:27017").unwrap();
        report.event(&ProbeEvent::DatabasesListed(&names)).unwrap();
        report.event(&ProbeEvent::Written(&"abc".into())).unwrap();
        report.event(&ProbeEvent::ReadBack(&document)).unwrap();
        report.event(&ProbeEvent::CleanedUp(1)).unwrap();
        report.passed().unwrap();

        let out = rendered(report);
        assert!(out.contains("Available databases: [\"admin\", \"local\"]"));
        assert!(out.contains("✅ Write test successful"));
        assert!(out.contains("✅ Read test successful"));
        assert!(out.contains("✅ Cleanup successful"));
        assert!(out.contains("🎉 MongoDB connection test PASSED!"));
        assert!(!out.contains("❌"));
    }

    #[test]
    fn test_failure_output_has_four_hints() {
        let mut report = Report::new(Vec::new());
        let error = ProbeError::Missing {
            probe_id: database::mongodb::ProbeDocument::new().probe_id,
        };

        report.failed(&error, Some(error.step()), Some("app")).unwrap();

        let out = rendered(report);
        assert!(out.contains("❌ MongoDB connection test FAILED during read"));
        assert!(out.contains("🔧 Troubleshooting steps:"));
        let hint_lines = out
            .lines()
            .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
            .count();
        assert_eq!(hint_lines, 4);
        assert!(out.contains("3. Ensure database user 'app' exists"));
    }

    #[test]
    fn test_failure_without_step() {
        let mut report = Report::new(Vec::new());

        report.failed(&"MONGODB_URL is not set", None, None).unwrap();

        let out = rendered(report);
        assert!(out.starts_with("❌ MongoDB connection test FAILED: MONGODB_URL is not set"));
        assert!(out.contains("4. Verify connection string format"));
    }
}
