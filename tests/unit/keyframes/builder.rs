use super::*;

fn d(y: i32, m: u32) -> CalendarDate {
    CalendarDate::from_ymd_opt(y, m, 1).unwrap()
}

fn obs(date: CalendarDate, id: &str, value: f64) -> Observation {
    Observation::new(date, id, format!("Book {id}"), value)
}

fn values(kf: &Keyframe) -> Vec<(&str, f64)> {
    kf.entries
        .iter()
        .map(|e| (e.entity_id.as_str(), e.value))
        .collect()
}

#[test]
fn two_quarters_two_subdivisions() {
    let o = vec![
        obs(d(2020, 1), "A", 10.0),
        obs(d(2020, 1), "B", 5.0),
        obs(d(2020, 4), "A", 20.0),
        obs(d(2020, 4), "B", 5.0),
    ];
    let kfs = build_keyframes(&o, 2).unwrap();
    assert_eq!(kfs.len(), 3);
    assert_eq!(values(&kfs[0]), vec![("A", 10.0), ("B", 5.0)]);
    assert_eq!(values(&kfs[1]), vec![("A", 15.0), ("B", 5.0)]);
    assert_eq!(values(&kfs[2]), vec![("A", 20.0), ("B", 5.0)]);
}

#[test]
fn timestamps_are_spaced_by_elapsed_time() {
    let o = vec![
        obs(CalendarDate::from_ymd_opt(2020, 1, 1).unwrap(), "A", 0.0),
        obs(CalendarDate::from_ymd_opt(2020, 1, 5).unwrap(), "A", 4.0),
        obs(CalendarDate::from_ymd_opt(2020, 1, 6).unwrap(), "A", 5.0),
    ];
    let kfs = build_keyframes(&o, 2).unwrap();
    let stamps: Vec<String> = kfs.iter().map(|k| k.timestamp.to_string()).collect();
    assert_eq!(
        stamps,
        vec![
            "2020-01-01 00:00:00",
            "2020-01-03 00:00:00",
            "2020-01-05 00:00:00",
            "2020-01-05 12:00:00",
            "2020-01-06 00:00:00",
        ]
    );
}

#[test]
fn missing_entities_are_zero_filled_with_first_seen_labels() {
    let o = vec![
        obs(d(2020, 1), "A", 3.0),
        obs(d(2020, 4), "B", 8.0).with_group_key("Travel"),
    ];
    let kfs = build_keyframes(&o, 1).unwrap();
    assert_eq!(kfs.len(), 2);
    assert_eq!(values(&kfs[0]), vec![("A", 3.0), ("B", 0.0)]);
    assert_eq!(kfs[0].entries[1].label, "Book B");
    assert_eq!(kfs[0].entries[1].group_key, "Travel");
    assert_eq!(values(&kfs[1]), vec![("B", 8.0), ("A", 0.0)]);
}

#[test]
fn ties_keep_first_appearance_order() {
    let o = vec![
        obs(d(2020, 1), "C", 1.0),
        obs(d(2020, 1), "A", 1.0),
        obs(d(2020, 1), "B", 1.0),
    ];
    let kfs = build_keyframes(&o, 3).unwrap();
    assert_eq!(kfs.len(), 1);
    assert_eq!(values(&kfs[0]), vec![("C", 1.0), ("A", 1.0), ("B", 1.0)]);
}

#[test]
fn overtakes_reorder_mid_segment() {
    let o = vec![
        obs(d(2020, 1), "A", 10.0),
        obs(d(2020, 1), "B", 0.0),
        obs(d(2020, 4), "A", 10.0),
        obs(d(2020, 4), "B", 20.0),
    ];
    let kfs = build_keyframes(&o, 4).unwrap();
    assert_eq!(values(&kfs[1]), vec![("A", 10.0), ("B", 5.0)]);
    // Equal at step 2: A first appeared first and stays ahead.
    assert_eq!(values(&kfs[2]), vec![("A", 10.0), ("B", 10.0)]);
    assert_eq!(values(&kfs[3]), vec![("B", 15.0), ("A", 10.0)]);
}

#[test]
fn duplicate_observation_keeps_the_later_one() {
    let o = vec![
        obs(d(2020, 1), "A", 1.0),
        Observation::new(d(2020, 1), "A", "Renamed", 9.0),
    ];
    let kfs = build_keyframes(&o, 1).unwrap();
    assert_eq!(values(&kfs[0]), vec![("A", 9.0)]);
    assert_eq!(kfs[0].entries[0].label, "Renamed");
}

#[test]
fn input_order_of_dates_does_not_matter() {
    let forward = vec![obs(d(2020, 1), "A", 1.0), obs(d(2020, 4), "A", 2.0)];
    let backward = vec![obs(d(2020, 4), "A", 2.0), obs(d(2020, 1), "A", 1.0)];
    assert_eq!(
        build_keyframes(&forward, 3).unwrap(),
        build_keyframes(&backward, 3).unwrap()
    );
}

#[test]
fn empty_input_is_rejected() {
    let err = build_keyframes(&[], 4).unwrap_err();
    assert!(matches!(err, RaceError::InvalidInput(_)));
}

#[test]
fn zero_subdivisions_is_rejected() {
    let err = build_keyframes(&[obs(d(2020, 1), "A", 1.0)], 0).unwrap_err();
    assert!(matches!(err, RaceError::InvalidInput(_)));
}

#[test]
fn malformed_observation_is_rejected() {
    let o = vec![obs(d(2020, 1), "A", 1.0), obs(d(2020, 4), "A", f64::NAN)];
    let err = build_keyframes(&o, 2).unwrap_err();
    assert!(matches!(err, RaceError::InvalidInput(_)));
}

#[test]
fn zero_duration_segment_collapses_to_one_keyframe() {
    let a = obs(d(2020, 1), "A", 1.0);
    let from = Snapshot {
        timestamp: report_timestamp(a.date),
        rows: vec![Row {
            meta: &a,
            value: 1.0,
        }],
    };
    let to = Snapshot {
        timestamp: report_timestamp(a.date),
        rows: vec![Row {
            meta: &a,
            value: 7.0,
        }],
    };
    let mut out = Vec::new();
    expand_segment(&from, &to, 5, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(values(&out[0]), vec![("A", 1.0)]);
}

#[test]
fn values_are_not_rounded() {
    let o = vec![obs(d(2020, 1), "A", 0.0), obs(d(2020, 4), "A", 1.0)];
    let kfs = build_keyframes(&o, 3).unwrap();
    assert_eq!(kfs[1].entries[0].value, 1.0 / 3.0);
    assert_eq!(kfs[2].entries[0].value, 2.0 / 3.0);
}

#[test]
fn keyframe_helpers() {
    let o = vec![
        obs(CalendarDate::from_ymd_opt(2020, 5, 15).unwrap(), "A", 3.0),
        obs(CalendarDate::from_ymd_opt(2020, 5, 15).unwrap(), "B", 4.0),
    ];
    let kf = &build_keyframes(&o, 1).unwrap()[0];
    assert_eq!(kf.quarter_label(), "2020Q2");
    assert_eq!(kf.max_value(), 4.0);
    assert_eq!(kf.top(1).len(), 1);
    assert_eq!(kf.top(1)[0].entity_id, "B");
    assert_eq!(kf.top(10).len(), 2);
}
