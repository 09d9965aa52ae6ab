use serde::{Deserialize, Serialize};

/// An opaque lead-list selection. The core only carries it along for routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadRef(pub serde_json::Value);

impl LeadRef {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    /// The lead's email address, when the selection carries one.
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(|v| v.as_str())
    }
}

/// Who the campaign is currently routed to.
///
/// Passed explicitly into editor and planner calls instead of living in shared
/// state, so the same graph can be edited or planned for different recipients.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutingContext {
    pub recipient: Option<String>,
    pub lead_sources: Vec<LeadRef>,
}

impl RoutingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_lead_sources(mut self, lead_sources: Vec<LeadRef>) -> Self {
        self.lead_sources = lead_sources;
        self
    }

    /// Adopts the first selected lead with an email as recipient.
    pub fn route_to_first_lead(&mut self) {
        if let Some(email) = self.lead_sources.iter().find_map(LeadRef::email) {
            self.recipient = Some(email.to_string());
        }
    }

    /// A recipient counts as configured only when it is non-blank.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    pub fn has_recipient(&self) -> bool {
        self.recipient().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_recipient_is_not_configured() {
        let ctx = RoutingContext::new().with_recipient("   ");
        assert!(!ctx.has_recipient());
        assert!(RoutingContext::new().with_recipient("a@b.io").has_recipient());
    }

    #[test]
    fn test_route_to_first_lead_with_email() {
        let mut ctx = RoutingContext::new().with_lead_sources(vec![
            LeadRef::new(json!({ "name": "No email" })),
            LeadRef::new(json!({ "name": "Ada", "email": "ada@example.com" })),
        ]);
        ctx.route_to_first_lead();
        assert_eq!(ctx.recipient(), Some("ada@example.com"));
    }
}
