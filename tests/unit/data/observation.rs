use super::*;

fn date() -> CalendarDate {
    CalendarDate::from_ymd_opt(2020, 1, 15).unwrap()
}

#[test]
fn builder_sets_optional_labels() {
    let o = Observation::new(date(), "b1", "Book", 3.0)
        .with_secondary_label("Author")
        .with_group_key("Fiction");
    assert_eq!(o.secondary_label, "Author");
    assert_eq!(o.group_key, "Fiction");
    assert!(o.validate().is_ok());
}

#[test]
fn empty_entity_id_is_invalid() {
    let err = Observation::new(date(), "  ", "Book", 1.0)
        .validate()
        .unwrap_err();
    assert!(matches!(err, RaceError::InvalidInput(_)));
}

#[test]
fn non_finite_values_are_invalid() {
    for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = Observation::new(date(), "b1", "Book", v)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RaceError::InvalidInput(_)));
    }
}

#[test]
fn json_defaults_optional_labels() {
    let o: Observation = serde_json::from_str(
        r#"{ "date": "2020-01-15", "entity_id": "b1", "label": "Book", "value": 2.5 }"#,
    )
    .unwrap();
    assert_eq!(o.date, date());
    assert_eq!(o.secondary_label, "");
    assert_eq!(o.group_key, "");
    assert_eq!(o.value, 2.5);
}
