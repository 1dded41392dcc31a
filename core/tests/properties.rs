use proptest::prelude::*;
use qgram_core::ped::prefix_edit_distance;
use qgram_core::tokenizer::{normalize, qgrams};
use qgram_core::{EngineConfig, QGramIndex, Record};

// Latin text with accents, digits, punctuation and both decomposed and
// precomposed umlauts.
const TEXT: &str = "[a-zA-Z0-9äöüÄÖÜßéè\u{0308} ,.;'$()_-]{0,24}";

proptest! {
    #[test]
    fn normalize_is_idempotent(s in TEXT) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn one_qgram_per_normalized_char(s in TEXT, q in 1usize..6) {
        prop_assert_eq!(qgrams(&s, q).len(), normalize(&s).chars().count());
    }

    #[test]
    fn ped_of_a_string_with_itself_is_zero(s in "[a-zäöü0-9]{0,16}", d in 0usize..4) {
        prop_assert_eq!(prefix_edit_distance(&s, &s, d), 0);
    }

    #[test]
    fn ped_never_exceeds_the_cap(a in "[a-e]{0,12}", b in "[a-e]{0,20}", d in 0usize..5) {
        prop_assert!(prefix_edit_distance(&a, &b, d) <= d + 1);
    }

    #[test]
    fn ped_of_a_prefix_is_zero(a in "[a-z]{0,10}", tail in "[a-z]{0,10}", d in 0usize..3) {
        let b = format!("{a}{tail}");
        prop_assert_eq!(prefix_edit_distance(&a, &b, d), 0);
    }

    #[test]
    fn search_hits_are_sorted_and_resolvable(
        names in prop::collection::vec("[a-f]{1,8}", 0..20),
        query in "[a-f]{0,8}",
    ) {
        let records = names.iter().enumerate().map(|(i, n)| Record::new(n.as_str(), (i % 3) as i64));
        let idx = QGramIndex::build(EngineConfig::default(), records).unwrap();
        let hits = idx.search(&query);
        let delta = query.chars().count() / 4;
        for pair in hits.windows(2) {
            prop_assert!((pair[0].ped, -pair[0].score) <= (pair[1].ped, -pair[1].score));
        }
        for hit in &hits {
            prop_assert!(hit.ped <= delta);
            prop_assert_eq!(idx.entity_name(hit.entity_id).unwrap(), hit.name);
        }
    }
}
