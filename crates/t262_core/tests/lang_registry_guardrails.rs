use std::collections::HashMap;

use t262_core::errors::ErrorKind;
use t262_core::lang::errors;
use t262_core::lang::harness;
use t262_core::lang::keywords;
use t262_core::lang::operators;
use t262_core::lang::punctuation;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for (index, info) in keywords::KEYWORDS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "keyword table out of enum order at {:?}", info.id);
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(keywords::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate keyword spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for (index, info) in operators::OPERATORS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "operator table out of enum order at {:?}", info.id);
        assert_eq!(operators::from_str(info.canonical), Some(info.id));
        assert_eq!(operators::as_str(info.id), info.canonical);
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    for (index, info) in punctuation::PUNCTUATION.iter().enumerate() {
        assert_eq!(info.id as usize, index, "punctuation table out of enum order at {:?}", info.id);
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        assert_eq!(punctuation::as_str(info.id), info.canonical);
    }
}

#[test]
fn operator_and_punctuation_spellings_do_not_collide() {
    for p in punctuation::PUNCTUATION {
        assert_eq!(
            operators::from_str(p.canonical),
            None,
            "{:?} registered as both punctuation and operator",
            p.canonical
        );
    }
}

#[test]
fn error_kinds_table_matches_enum() {
    let kinds = [
        ErrorKind::Error,
        ErrorKind::TypeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
        ErrorKind::RangeError,
        ErrorKind::Test262Error,
    ];
    assert_eq!(kinds.len(), errors::ERROR_KINDS.len());
    for kind in kinds {
        assert_eq!(errors::info_for(kind).id, kind);
        assert_eq!(errors::from_str(kind.name()), Some(kind));
        assert!(!errors::info_for(kind).description.is_empty());
    }
}

#[test]
fn harness_bindings_and_tags_resolvable() {
    for (index, info) in harness::BINDINGS.iter().enumerate() {
        assert_eq!(info.id as usize, index);
        assert_eq!(harness::binding_from_str(info.canonical), Some(info.id));
        // Bindings live in the global scope: they must not shadow reserved words.
        assert_eq!(keywords::from_str(info.canonical), None);
    }
    for (index, info) in harness::TAGS.iter().enumerate() {
        assert_eq!(info.id as usize, index);
        assert_eq!(harness::tag_from_str(info.canonical), Some(info.id));
        assert!(!info.canonical.starts_with('@'));
    }
}

#[test]
fn test262_error_binding_matches_error_kind_name() {
    assert_eq!(
        harness::binding_name(harness::HarnessBindingId::Test262Error),
        ErrorKind::Test262Error.name()
    );
}
