//! Serde roundtrip and JsonSchema validation tests for fixture and report types.

use std::collections::BTreeMap;

use alm_core::enums::{ConfigMode, ViolationRule};
use alm_core::record::*;
use alm_core::responses::*;
use alm_core::sample::YearRange;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn spring_record() -> Record {
    Record {
        input_date: "2024-02-04 10:30".into(),
        yeargod: ConfigMode::NoDuty,
        lunar: LunarDate {
            year: 2023,
            month: 12,
            day: 25,
            is_leap: false,
            year_cn: "二零二三".into(),
            month_cn: "腊月大".into(),
            day_cn: "廿五".into(),
            week_day: "星期日".into(),
            season: "孟春".into(),
            season_name: "立春".into(),
            month_type: "大".into(),
            zodiac_year: "兔".into(),
        },
        bazi: Bazi {
            year: "癸卯".into(),
            month: "丙寅".into(),
            day: "戊戌".into(),
            hour: "丁巳".into(),
            year_num: 3,
            month_num: 2,
            day_num: 10,
        },
        solar_terms: SolarTerms {
            today: "立春".into(),
            next_name: "雨水".into(),
            next_date: "02-19".into(),
            next_year: 2024,
            this_year_table: SolarTermTable::new(vec![
                SolarTermDate {
                    name: "小寒".into(),
                    month: 1,
                    day: 6,
                },
                SolarTermDate {
                    name: "立春".into(),
                    month: 2,
                    day: 4,
                },
            ]),
        },
        deities: Deities {
            officer12: "建".into(),
            god12: "司命".into(),
            day_type: "黄道日".into(),
            star28: "斗".into(),
            fly9: "852963741".into(),
            star_zodiac: "水瓶座".into(),
            east_zodiac: "玄枵".into(),
        },
        clash: ZodiacClash {
            desc: "狗日冲龙".into(),
            mark3: strings(&["虎", "马"]),
            mark6: "兔".into(),
        },
        five_elements: FiveElements {
            full_desc: strings(&["天干", "戊", "属土"]),
            nayin: "平地木".into(),
        },
        peng_taboo: PengTaboo {
            full: "戊不受田田主不祥,戌不吃犬作怪上床".into(),
            short: "戊不受田<br>戌不吃犬".into(),
        },
        two_hour: TwoHour {
            list: strings(&["壬子", "癸丑"]),
            lucky: strings(&["吉", "凶"]),
            meridians: "脾".into(),
        },
        directions: strings(&["喜神东南", "财神正北"]),
        fetal_god: "仓库栖外东南".into(),
        yi: strings(&["祭祀", "祈福"]),
        ji: strings(&["动土"]),
        god_names: GodNames {
            good: strings(&["天德", "月德"]),
            bad: strings(&["月建"]),
        },
        thing_level: 2,
        thing_level_name: "平".into(),
        holidays: Holidays {
            legal: String::new(),
            other: String::new(),
            lunar: String::new(),
        },
    }
}

roundtrip_and_validate!(record_roundtrip, Record, spring_record());

roundtrip_and_validate!(
    generate_summary_roundtrip,
    GenerateSummary,
    GenerateSummary {
        output: "full_test.json".into(),
        range: YearRange::new(1901, 2099).unwrap(),
        records: 290_724,
        oracle_failures: 0,
        elapsed_ms: 1_200,
    }
);

roundtrip_and_validate!(
    verify_report_roundtrip,
    VerifyReport,
    VerifyReport {
        path: "full_test.json".into(),
        sha256: "ab".repeat(32),
        records: 8,
        days: 2,
        expected_records: Some(8),
        schema_checked: true,
        passed: false,
        violation_count: 1,
        violations_by_rule: BTreeMap::from([(ViolationRule::UnsortedSet.to_string(), 1)]),
        violations: vec![Violation {
            record: 3,
            input_date: Some("2024-02-04 23:30".into()),
            rule: ViolationRule::UnsortedSet,
            detail: "yi is not strictly ascending".into(),
        }],
    }
);

roundtrip_and_validate!(
    compare_report_roundtrip,
    CompareReport,
    CompareReport {
        expected: "golden.json".into(),
        actual: "candidate.json".into(),
        total: 4,
        passed: 3,
        failed: 1,
        pass_rate: "75.0000%".into(),
        missing: 0,
        extra: 0,
        section_failures: BTreeMap::from([("bazi".to_string(), 1)]),
        mismatches: vec![CompareMismatch {
            record: 2,
            input_date: "2024-02-04 10:30".into(),
            yeargod: "duty".into(),
            sections: vec!["bazi".into()],
        }],
    }
);

#[test]
fn record_keys_serialize_in_schema_order() {
    let value = serde_json::to_value(spring_record()).unwrap();
    let json = serde_json::to_string(&spring_record()).unwrap();
    assert!(json.starts_with(r#"{"input_date":"2024-02-04 10:30","yeargod":"noduty","lunar":{"#));

    let object = value.as_object().unwrap();
    assert_eq!(object.len(), SECTIONS.len() + 2);
    for section in SECTIONS {
        assert!(object.contains_key(*section), "missing section {section}");
    }
}

#[test]
fn record_schema_rejects_missing_section() {
    let schema = serde_json::to_value(schema_for!(Record)).unwrap();
    let mut instance = serde_json::to_value(spring_record()).unwrap();
    instance.as_object_mut().unwrap().remove("holidays");
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn record_schema_rejects_triple_in_term_table() {
    let schema = serde_json::to_value(schema_for!(Record)).unwrap();
    let mut instance = serde_json::to_value(spring_record()).unwrap();
    instance["solar_terms"]["this_year_table"]["立春"] = serde_json::json!([2, 4, 0]);
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}
