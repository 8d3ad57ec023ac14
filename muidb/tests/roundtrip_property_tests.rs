use muidb::{Database, LoadOptions};
use proptest::prelude::*;

fn id_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z][A-Za-z0-9_.]{0,15}").expect("valid id regex")
}

fn lang_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en".to_string()),
        Just("de".to_string()),
        Just("fr-CA".to_string()),
        Just("zh-Hans".to_string()),
    ]
}

fn state_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("initial".to_string()),
        Just("translated".to_string()),
        Just("reviewed".to_string()),
        Just("final".to_string()),
        Just("needs-review-l10n".to_string()),
    ]
}

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 <>&'\"_\\-\\.,!\\?äöüß]{0,30}").expect("valid text regex")
}

#[derive(Debug, Clone)]
enum Mutation {
    Translate {
        id: String,
        lang: String,
        text: String,
        state: String,
        comment: Option<String>,
    },
    Output {
        name: String,
        lang: String,
    },
}

fn mutation_strategy() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        4 => (
            id_strategy(),
            lang_strategy(),
            text_strategy(),
            state_strategy(),
            proptest::option::of(text_strategy()),
        )
            .prop_map(|(id, lang, text, state, comment)| Mutation::Translate {
                id,
                lang,
                text,
                state,
                comment,
            }),
        1 => (id_strategy(), lang_strategy()).prop_map(|(name, lang)| Mutation::Output {
            name: format!("{}.resx", name),
            lang,
        }),
    ]
}

fn build(mutations: &[Mutation]) -> Database {
    let mut db = Database::new();
    for mutation in mutations {
        match mutation {
            Mutation::Translate {
                id,
                lang,
                text,
                state,
                comment,
            } => {
                db.add_or_update_translation(id, lang, text, state, comment.as_deref())
                    .expect("valid record");
            }
            Mutation::Output { name, lang } => {
                db.add_output_file(name.as_str(), lang.as_str())
                    .expect("valid output file");
            }
        }
    }
    db
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn save_then_load_preserves_database(mutations in prop::collection::vec(mutation_strategy(), 0..24)) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let path = tmp.path().join("roundtrip.muidb");

        let db = build(&mutations);
        db.save_to(&path).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let loaded = Database::load(&path, &LoadOptions::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(&loaded, &db);
        prop_assert!(loaded.load_anomalies().is_empty());
    }

    #[test]
    fn saving_twice_is_byte_stable(mutations in prop::collection::vec(mutation_strategy(), 0..24)) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let first = tmp.path().join("first.muidb");
        let second = tmp.path().join("second.muidb");

        build(&mutations).save_to(&first).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let loaded = Database::load(&first, &LoadOptions::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        loaded.save_to(&second).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let a = std::fs::read(&first).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let b = std::fs::read(&second).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(a, b);
    }
}
