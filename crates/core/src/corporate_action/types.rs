//! Corporate-action request, validated form, and outbound event payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CorporateActionError;

/// Action-type code for strategic rebrandings. Records of this type fan
/// out an event to the message broker after the database write.
pub const REBRANDING_ACTION_TYPE_ID: i32 = 16;

/// Creation payload for a corporate action record with its detail rows.
///
/// Every field deserializes as optional so that missing required fields
/// surface as a validation error with the original response envelope
/// rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCorporateActionRequest {
    /// Source security the action applies to.
    pub source_stock_id: Option<Uuid>,
    /// Action-type lookup code.
    pub corp_action_type_id: Option<i32>,
    /// Ex-date as epoch seconds.
    pub ex_date: Option<i64>,
    /// Record date as epoch seconds.
    pub record_date: Option<i64>,
    /// Allotment date as epoch seconds, when known.
    pub allotment_date: Option<i64>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Active flag, defaults to true.
    pub is_active: Option<bool>,
    /// Entitlement ratio lines; at least one is required.
    #[serde(default)]
    pub details: Vec<CorporateActionDetailInput>,
}

/// One entitlement ratio line of the creation payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateActionDetailInput {
    /// Target security issued by the action; null for cash outcomes.
    pub target_stock_id: Option<Uuid>,
    /// Quantity held side of the entitlement ratio.
    pub ratio_quantity_held: Option<Decimal>,
    /// Quantity entitled side of the entitlement ratio.
    pub ratio_quantity_entitled: Option<Decimal>,
    /// Book value held side, when applicable.
    pub ratio_book_value_held: Option<Decimal>,
    /// Book value entitled side, when applicable.
    pub ratio_book_value_entitled: Option<Decimal>,
    /// Whether this line represents a cash realization rather than an
    /// issued security.
    pub target_sale_row: Option<bool>,
    /// Reference document URL.
    pub reference_doc_url: Option<String>,
    /// Free-text remark.
    pub remark: Option<String>,
}

/// A creation payload with required fields proven present and optional
/// fields defaulted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCorporateAction {
    /// Source security the action applies to.
    pub source_stock_id: Uuid,
    /// Action-type lookup code.
    pub corp_action_type_id: i32,
    /// Ex-date as epoch seconds.
    pub ex_date: i64,
    /// Record date as epoch seconds.
    pub record_date: i64,
    /// Allotment date as epoch seconds, when known.
    pub allotment_date: Option<i64>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Entitlement ratio lines, order preserved from the request.
    pub details: Vec<ValidatedDetail>,
}

/// A validated entitlement ratio line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedDetail {
    /// Target security issued by the action; null for cash outcomes.
    pub target_stock_id: Option<Uuid>,
    /// Quantity held side of the entitlement ratio.
    pub ratio_quantity_held: Decimal,
    /// Quantity entitled side of the entitlement ratio.
    pub ratio_quantity_entitled: Decimal,
    /// Book value held side, when applicable.
    pub ratio_book_value_held: Option<Decimal>,
    /// Book value entitled side, when applicable.
    pub ratio_book_value_entitled: Option<Decimal>,
    /// Whether this line represents a cash realization.
    pub target_sale_row: bool,
    /// Reference document URL.
    pub reference_doc_url: Option<String>,
    /// Free-text remark.
    pub remark: Option<String>,
}

impl CreateCorporateActionRequest {
    /// Validates the payload into its canonical form.
    ///
    /// Requires `sourceStockId`, `corpActionTypeId`, `exDate`,
    /// `recordDate`, a non-empty `details` array, and within each detail
    /// both `ratioQuantityHeld` and `ratioQuantityEntitled`.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, or `EmptyDetails` when no detail
    /// rows were supplied.
    pub fn validate(&self) -> Result<ValidatedCorporateAction, CorporateActionError> {
        let source_stock_id = self
            .source_stock_id
            .ok_or(CorporateActionError::MissingField("sourceStockId"))?;
        let corp_action_type_id = self
            .corp_action_type_id
            .ok_or(CorporateActionError::MissingField("corpActionTypeId"))?;
        let ex_date = self
            .ex_date
            .ok_or(CorporateActionError::MissingField("exDate"))?;
        let record_date = self
            .record_date
            .ok_or(CorporateActionError::MissingField("recordDate"))?;

        if self.details.is_empty() {
            return Err(CorporateActionError::EmptyDetails);
        }

        let details = self
            .details
            .iter()
            .map(CorporateActionDetailInput::validate)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedCorporateAction {
            source_stock_id,
            corp_action_type_id,
            ex_date,
            record_date,
            allotment_date: self.allotment_date,
            remark: self.remark.clone(),
            is_active: self.is_active.unwrap_or(true),
            details,
        })
    }
}

impl CorporateActionDetailInput {
    fn validate(&self) -> Result<ValidatedDetail, CorporateActionError> {
        Ok(ValidatedDetail {
            target_stock_id: self.target_stock_id,
            ratio_quantity_held: self
                .ratio_quantity_held
                .ok_or(CorporateActionError::MissingField("ratioQuantityHeld"))?,
            ratio_quantity_entitled: self
                .ratio_quantity_entitled
                .ok_or(CorporateActionError::MissingField("ratioQuantityEntitled"))?,
            ratio_book_value_held: self.ratio_book_value_held,
            ratio_book_value_entitled: self.ratio_book_value_entitled,
            target_sale_row: self.target_sale_row.unwrap_or(false),
            reference_doc_url: self.reference_doc_url.clone(),
            remark: self.remark.clone(),
        })
    }
}

impl ValidatedCorporateAction {
    /// Whether this action must fan out a rebranding event to the broker.
    #[must_use]
    pub fn is_rebranding(&self) -> bool {
        self.corp_action_type_id == REBRANDING_ACTION_TYPE_ID
    }
}

/// Event payload published to the rebranding queue: the request fields in
/// their wire shape plus a server-side timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateActionEvent {
    /// Source security the action applies to.
    pub source_stock_id: Uuid,
    /// Action-type lookup code.
    pub corp_action_type_id: i32,
    /// Ex-date as epoch seconds.
    pub ex_date: i64,
    /// Record date as epoch seconds.
    pub record_date: i64,
    /// Allotment date as epoch seconds, when known.
    pub allotment_date: Option<i64>,
    /// Entitlement ratio lines, order preserved.
    pub details: Vec<ValidatedDetail>,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Epoch seconds at which the event was built.
    pub timestamp: i64,
}

impl CorporateActionEvent {
    /// Builds the event from a validated action and a timestamp.
    #[must_use]
    pub fn new(action: &ValidatedCorporateAction, timestamp: i64) -> Self {
        Self {
            source_stock_id: action.source_stock_id,
            corp_action_type_id: action.corp_action_type_id,
            ex_date: action.ex_date,
            record_date: action.record_date,
            allotment_date: action.allotment_date,
            details: action.details.clone(),
            remark: action.remark.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn stock_id() -> Uuid {
        Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").expect("valid uuid")
    }

    fn detail() -> CorporateActionDetailInput {
        CorporateActionDetailInput {
            ratio_quantity_held: Some(dec!(1)),
            ratio_quantity_entitled: Some(dec!(2)),
            ..CorporateActionDetailInput::default()
        }
    }

    fn request() -> CreateCorporateActionRequest {
        CreateCorporateActionRequest {
            source_stock_id: Some(stock_id()),
            corp_action_type_id: Some(5),
            ex_date: Some(1_700_000_000),
            record_date: Some(1_700_500_000),
            details: vec![detail()],
            ..CreateCorporateActionRequest::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let action = request().validate().expect("valid request");
        assert_eq!(action.source_stock_id, stock_id());
        assert_eq!(action.corp_action_type_id, 5);
        assert_eq!(action.details.len(), 1);
    }

    #[rstest]
    #[case::source_stock("sourceStockId")]
    #[case::action_type("corpActionTypeId")]
    #[case::ex_date("exDate")]
    #[case::record_date("recordDate")]
    fn test_missing_required_field_rejected(#[case] field: &'static str) {
        let mut req = request();
        match field {
            "sourceStockId" => req.source_stock_id = None,
            "corpActionTypeId" => req.corp_action_type_id = None,
            "exDate" => req.ex_date = None,
            "recordDate" => req.record_date = None,
            _ => unreachable!(),
        }
        assert_eq!(
            req.validate().unwrap_err(),
            CorporateActionError::MissingField(field)
        );
    }

    #[test]
    fn test_empty_details_rejected() {
        let mut req = request();
        req.details.clear();
        assert_eq!(req.validate().unwrap_err(), CorporateActionError::EmptyDetails);
    }

    #[test]
    fn test_detail_missing_ratio_rejected() {
        let mut req = request();
        req.details[0].ratio_quantity_held = None;
        assert_eq!(
            req.validate().unwrap_err(),
            CorporateActionError::MissingField("ratioQuantityHeld")
        );

        let mut req = request();
        req.details[0].ratio_quantity_entitled = None;
        assert_eq!(
            req.validate().unwrap_err(),
            CorporateActionError::MissingField("ratioQuantityEntitled")
        );
    }

    #[test]
    fn test_defaults_applied() {
        let action = request().validate().expect("valid request");
        assert!(action.is_active);
        assert!(action.allotment_date.is_none());
        assert!(!action.details[0].target_sale_row);
        assert!(action.details[0].target_stock_id.is_none());
    }

    #[test]
    fn test_details_preserve_order() {
        let mut req = request();
        let mut second = detail();
        second.ratio_quantity_held = Some(dec!(3));
        req.details.push(second);

        let action = req.validate().expect("valid request");
        assert_eq!(action.details.len(), 2);
        assert_eq!(action.details[0].ratio_quantity_held, dec!(1));
        assert_eq!(action.details[1].ratio_quantity_held, dec!(3));
    }

    #[test]
    fn test_rebranding_predicate() {
        let mut req = request();
        assert!(!req.validate().expect("valid").is_rebranding());

        req.corp_action_type_id = Some(REBRANDING_ACTION_TYPE_ID);
        assert!(req.validate().expect("valid").is_rebranding());
    }

    #[test]
    fn test_event_mirrors_request_plus_timestamp() {
        let mut req = request();
        req.corp_action_type_id = Some(REBRANDING_ACTION_TYPE_ID);
        req.remark = Some("name change".to_string());
        let action = req.validate().expect("valid request");

        let event = CorporateActionEvent::new(&action, 1_701_000_000);
        let json = serde_json::to_value(&event).expect("serializes");

        assert_eq!(json["sourceStockId"], stock_id().to_string());
        assert_eq!(json["corpActionTypeId"], 16);
        assert_eq!(json["exDate"], 1_700_000_000_i64);
        assert_eq!(json["recordDate"], 1_700_500_000_i64);
        assert_eq!(json["allotmentDate"], serde_json::Value::Null);
        assert_eq!(json["remark"], "name change");
        assert_eq!(json["timestamp"], 1_701_000_000_i64);
        assert_eq!(json["details"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["details"][0]["targetSaleRow"], false);
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let req: CreateCorporateActionRequest = serde_json::from_str(
            r#"{
                "sourceStockId": "550e8400-e29b-41d4-a716-446655440000",
                "corpActionTypeId": 5,
                "exDate": 1700000000,
                "recordDate": 1700500000,
                "details": [{"ratioQuantityHeld": 1, "ratioQuantityEntitled": 2}]
            }"#,
        )
        .expect("deserializes");

        let action = req.validate().expect("valid request");
        assert_eq!(action.details[0].ratio_quantity_held, dec!(1));
        assert_eq!(action.details[0].ratio_quantity_entitled, dec!(2));
    }
}
