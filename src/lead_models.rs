use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::normalizer::{
    classify_lead_source, classify_project_type, split_full_name, SourceClassification,
};

/// Company recorded when the submission names none (Salesforce requires one).
pub const DEFAULT_COMPANY: &str = "Unknown";

const FULL_NAME_KEYS: &[&str] = &["full_name", "fullName", "name", "Full Name", "full name"];
const SOURCE_KEYS: &[&str] = &["source", "lead_source", "leadSource", "Source", "Lead Source"];
const PROJECT_TYPE_KEYS: &[&str] = &["project_type", "projectType", "Project Type", "project"];
const SCOPE_KEYS: &[&str] = &["scope", "project_scope", "description", "Scope", "message"];
const COMPANY_KEYS: &[&str] = &["company", "Company", "company_name"];
const EMAIL_KEYS: &[&str] = &["email", "Email", "email_address"];
const PHONE_KEYS: &[&str] = &["phone", "Phone", "phone_number", "phoneNumber"];

/// Lead submission after alias resolution.
///
/// Webhook senders (form builders, ad platforms, Zapier) spell the same field
/// in several ways; each field lists the accepted keys in lookup order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct InboundLead {
    /// Also accepted as `fullName`, `name`, `Full Name`, `full name`.
    pub full_name: Option<String>,
    /// Also accepted as `lead_source`, `leadSource`, `Source`, `Lead Source`.
    pub source: Option<String>,
    /// Also accepted as `projectType`, `Project Type`, `project`.
    pub project_type: Option<String>,
    /// Also accepted as `project_scope`, `description`, `Scope`, `message`.
    /// Kept exactly as sent, surrounding whitespace included.
    pub scope: Option<String>,
    /// Also accepted as `Company`, `company_name`.
    pub company: Option<String>,
    /// Also accepted as `Email`, `email_address`.
    pub email: Option<String>,
    /// Also accepted as `Phone`, `phone_number`, `phoneNumber`.
    pub phone: Option<String>,
}

impl InboundLead {
    /// Resolves the recognized fields out of an arbitrary JSON body.
    pub fn from_json(body: &Value) -> Result<Self, AppError> {
        let map = body.as_object().ok_or_else(|| {
            AppError::BadRequest("Lead payload must be a JSON object".to_string())
        })?;

        Ok(Self {
            full_name: resolve_alias(map, FULL_NAME_KEYS),
            source: resolve_alias(map, SOURCE_KEYS),
            project_type: resolve_alias(map, PROJECT_TYPE_KEYS),
            scope: resolve_raw_alias(map, SCOPE_KEYS),
            company: resolve_alias(map, COMPANY_KEYS),
            email: resolve_alias(map, EMAIL_KEYS),
            phone: resolve_alias(map, PHONE_KEYS),
        })
    }
}

/// Returns the first alias holding a non-blank scalar, trimmed.
///
/// Numbers and booleans are stringified; nulls, arrays and objects are skipped.
pub fn resolve_alias(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    resolve_raw_alias(map, aliases).map(|text| text.trim().to_string())
}

/// Like [`resolve_alias`], but string values are returned untrimmed.
pub fn resolve_raw_alias(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|key| {
        let text = match map.get(*key)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.trim().is_empty()).then_some(text)
    })
}

/// Lead record in Salesforce's field naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesforceLead {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "Phone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "LeadSource")]
    pub lead_source: String,
    #[serde(rename = "Project_Type__c", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SalesforceLead {
    /// Applies the normalization rules to a parsed submission.
    pub fn from_inbound(lead: &InboundLead) -> (Self, SourceClassification) {
        let name = split_full_name(lead.full_name.as_deref().unwrap_or_default());
        let source = classify_lead_source(lead.source.as_deref());
        let project_type =
            classify_project_type(lead.project_type.as_deref(), lead.scope.as_deref());

        let record = Self {
            first_name: name.first,
            last_name: name.last,
            company: lead
                .company
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPANY.to_string()),
            email: lead.email.as_ref().map(|e| e.to_lowercase()),
            phone: lead.phone.clone(),
            lead_source: source.label.to_string(),
            project_type: project_type.map(str::to_string),
            description: lead.scope.clone(),
        };

        (record, source)
    }
}

/// Body of a successful `POST /lead`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadCreatedResponse {
    pub success: bool,
    /// Salesforce record id of the new lead.
    pub lead_id: String,
    pub assigned_source: String,
    /// Omitted when no project type could be derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_project: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Whether an access token is cached; says nothing about its validity.
    pub salesforce_connected: bool,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aliases_resolve_in_order() {
        let lead = InboundLead::from_json(&json!({
            "name": "Ignored Because Later",
            "fullName": "Jane Doe",
            "Lead Source": "Yelp",
            "description": "deck repair",
            "phoneNumber": 5551234567u64,
        }))
        .unwrap();

        assert_eq!(lead.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(lead.source.as_deref(), Some("Yelp"));
        assert_eq!(lead.scope.as_deref(), Some("deck repair"));
        assert_eq!(lead.phone.as_deref(), Some("5551234567"));
        assert_eq!(lead.email, None);
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let lead = InboundLead::from_json(&json!({
            "full_name": "   ",
            "name": "John Smith",
            "email": null,
            "Email": "JOHN@EXAMPLE.COM",
        }))
        .unwrap();

        assert_eq!(lead.full_name.as_deref(), Some("John Smith"));
        assert_eq!(lead.email.as_deref(), Some("JOHN@EXAMPLE.COM"));
    }

    #[test]
    fn test_scope_passed_through_untrimmed() {
        let lead = InboundLead::from_json(&json!({
            "scope": "  \n",
            "Scope": "  Kitchen remodel, 200 sq ft\n",
        }))
        .unwrap();
        let (record, _) = SalesforceLead::from_inbound(&lead);

        assert_eq!(
            record.description.as_deref(),
            Some("  Kitchen remodel, 200 sq ft\n")
        );
        assert_eq!(record.project_type.as_deref(), Some("Kitchen"));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = InboundLead::from_json(&json!(["Jane Doe"])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_defaults_applied() {
        let (record, source) = SalesforceLead::from_inbound(&InboundLead::default());

        assert_eq!(record.first_name, "Unknown");
        assert_eq!(record.last_name, "Lead");
        assert_eq!(record.company, "Unknown");
        assert_eq!(record.lead_source, "Referral");
        assert!(!source.unrecognized);
        assert_eq!(record.project_type, None);
    }

    #[test]
    fn test_salesforce_field_names() {
        let inbound = InboundLead {
            full_name: Some("Jane Doe".to_string()),
            source: Some("yelp".to_string()),
            project_type: Some(String::new()),
            scope: Some("bathroom remodeling needed".to_string()),
            company: Some("Doe Holdings".to_string()),
            email: Some("Jane@Example.com".to_string()),
            phone: None,
        };
        let (record, _) = SalesforceLead::from_inbound(&inbound);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "FirstName": "Jane",
                "LastName": "Doe",
                "Company": "Doe Holdings",
                "Email": "jane@example.com",
                "LeadSource": "Yelp",
                "Project_Type__c": "Bathroom remodeling",
                "Description": "bathroom remodeling needed",
            })
        );
    }

    #[test]
    fn test_unset_project_type_is_omitted() {
        let inbound = InboundLead {
            scope: Some("fix a fence".to_string()),
            ..Default::default()
        };
        let (record, _) = SalesforceLead::from_inbound(&inbound);
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("Project_Type__c").is_none());
    }
}
