use super::*;

fn site_json(id: &str, score: i8) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "Hanauma Bay",
        "coordinates": { "latitude": 21.2690, "longitude": -157.6938 },
        "type": "bay",
        "description": "Protected marine life conservation area",
        "facilities": ["restrooms", "showers"],
        "best_conditions": "Calm mornings",
        "difficulty": "beginner",
        "conditions": {
            "sst": 26.4,
            "sst_anomaly": 0.8,
            "hotspot": null,
            "dhw": 2.1,
            "temperature_trend": "rising"
        },
        "risk": { "level": "Low", "color": "green", "score": score, "description": "Normal" },
        "last_updated": "2024-06-15T10:30:00"
    })
}

// =============================================================
// BleachingRisk
// =============================================================

#[test]
fn risk_level_follows_score_not_wire_level() {
    let site: SiteWithConditions = serde_json::from_value(site_json("hanauma", 3)).unwrap();
    assert_eq!(site.risk.score(), 3);
    assert_eq!(site.risk.level(), RiskLevel::Severe);
    assert_eq!(site.risk.color(), RiskColor::Red);
    assert!(site.risk.is_elevated());
}

#[test]
fn out_of_range_score_collapses_to_unknown() {
    let risk = BleachingRisk::new(9, "bogus");
    assert_eq!(risk.score(), -1);
    assert_eq!(risk.level(), RiskLevel::Unknown);
    assert_eq!(risk.color(), RiskColor::Gray);
    assert!(!risk.is_elevated());
}

#[test]
fn risk_serializes_derived_level_and_color() {
    let value = serde_json::to_value(BleachingRisk::new(2, "Elevated")).unwrap();
    assert_eq!(value["level"], "High");
    assert_eq!(value["color"], "orange");
    assert_eq!(value["score"], 2);
    assert_eq!(value["description"], "Elevated");
}

#[test]
fn risk_level_scores_are_ordinal() {
    let levels = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High, RiskLevel::Severe];
    for (expected, level) in levels.iter().enumerate() {
        assert_eq!(i64::from(level.score()), expected as i64);
        assert_eq!(RiskLevel::from_score(level.score()), *level);
    }
    assert_eq!(RiskLevel::Unknown.score(), -1);
}

#[test]
fn risk_level_display_matches_wire_name_and_honors_width() {
    assert_eq!(RiskLevel::Moderate.to_string(), "Moderate");
    assert_eq!(format!("[{:<9}]", RiskLevel::High), "[High     ]");
    let wire = serde_json::to_value(RiskLevel::Severe).unwrap();
    assert_eq!(wire, serde_json::Value::String(RiskLevel::Severe.to_string()));
}

// =============================================================
// Sites
// =============================================================

#[test]
fn site_with_conditions_flattens_site_fields() {
    let site: SiteWithConditions = serde_json::from_value(site_json("hanauma", 0)).unwrap();
    assert_eq!(site.id(), "hanauma");
    assert_eq!(site.site.site_type, SiteType::Bay);
    assert_eq!(site.site.difficulty, SiteDifficulty::Beginner);
    assert_eq!(site.site.facilities.len(), 2);
    let conditions = site.conditions.unwrap();
    assert_eq!(conditions.sst, Some(26.4));
    assert_eq!(conditions.hotspot, None);
    assert_eq!(conditions.trend(), TemperatureTrend::Rising);
}

#[test]
fn missing_conditions_and_unknown_trend_are_tolerated() {
    let mut raw = site_json("sharks-cove", -1);
    raw["conditions"] = serde_json::Value::Null;
    let site: SiteWithConditions = serde_json::from_value(raw).unwrap();
    assert!(site.conditions.is_none());

    let conditions: OceanConditions =
        serde_json::from_value(serde_json::json!({ "temperature_trend": "sideways" })).unwrap();
    assert_eq!(conditions.trend(), TemperatureTrend::Unknown);
    assert_eq!(OceanConditions::default().trend(), TemperatureTrend::Unknown);
}

#[test]
fn all_levels_difficulty_uses_snake_case() {
    let value = serde_json::to_value(SiteDifficulty::AllLevels).unwrap();
    assert_eq!(value, "all_levels");
}

// =============================================================
// Alerts
// =============================================================

#[test]
fn alert_severity_orders_by_ascending_risk() {
    assert!(AlertSeverity::Watch < AlertSeverity::Warning);
    assert!(AlertSeverity::Warning < AlertSeverity::Alert);
}

#[test]
fn alert_defaults_active_and_decodes_water_quality() {
    let alert: Alert = serde_json::from_value(serde_json::json!({
        "id": "a1",
        "type": "water_quality",
        "severity": "warning",
        "title": "Brown water advisory",
        "description": "Runoff after heavy rain",
        "created_at": "2024-06-15T08:00:00Z"
    }))
    .unwrap();
    assert_eq!(alert.alert_type, AlertType::WaterQuality);
    assert!(alert.is_active);
    assert!(alert.affected_sites.is_empty());
    assert_eq!(alert.expires_at, None);
}

// =============================================================
// Chat & misc
// =============================================================

#[test]
fn chat_request_omits_absent_session_id() {
    let request = ChatRequest { message: "hi".into(), session_id: None, include_context: true };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("session_id").is_none());
    assert_eq!(value["include_context"], true);
}

#[test]
fn site_forecast_defaults_model_version() {
    let forecast: SiteForecastResponse = serde_json::from_value(serde_json::json!({
        "site_id": "hanauma",
        "site_name": "Hanauma Bay",
        "forecast": [{
            "date": "2024-06-16",
            "predicted_sst": 26.9,
            "predicted_dhw": 2.4,
            "predicted_risk": "Moderate",
            "confidence": 0.82
        }],
        "generated_at": "2024-06-15T12:00:00"
    }))
    .unwrap();
    assert_eq!(forecast.model_version, "v1.0");
    assert_eq!(forecast.forecast[0].predicted_risk, RiskLevel::Moderate);
}

#[test]
fn history_statistics_default_when_absent() {
    let history: SiteHistoryResponse = serde_json::from_value(serde_json::json!({
        "site_id": "hanauma",
        "site_name": "Hanauma Bay",
        "data": [{ "date": "2024-06-14", "sst": null, "risk_level": null }],
        "period_start": "2024-05-16",
        "period_end": "2024-06-15"
    }))
    .unwrap();
    assert_eq!(history.statistics, HistoryStatistics::default());
    assert_eq!(history.data[0].sst, None);
}
