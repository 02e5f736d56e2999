//! Property-based tests for the Quine-McCluskey minimizer
//!
//! For random functions over up to four variables, every minimal form must agree with the
//! function on every index that is not a don't-care, and all forms must cost the same. Up to
//! three variables, that cost is also checked against an exhaustive search.

use proptest::prelude::*;
use smartscript_core::boolean::assignments::{minterms, Assignment};
use smartscript_core::boolean::{parse_expression, Minimizer, OperatorStyle};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Output {
    Off,
    On,
    DontCare,
}

fn function_strategy(max_variables: usize) -> impl Strategy<Value = (Vec<String>, Vec<Output>)> {
    (1..=max_variables).prop_flat_map(|count| {
        let names: Vec<String> = ["A", "B", "C", "D"][..count]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let outputs = prop::collection::vec(
            prop_oneof![
                3 => Just(Output::Off),
                3 => Just(Output::On),
                1 => Just(Output::DontCare),
            ],
            1 << count,
        );
        (Just(names), outputs)
    })
}

fn indices_of(outputs: &[Output], wanted: Output) -> BTreeSet<u32> {
    outputs
        .iter()
        .enumerate()
        .filter(|&(_, &o)| o == wanted)
        .map(|(i, _)| i as u32)
        .collect()
}

/// Cheapest (terms, literals) cover of the on-set over every product term that avoids the
/// off-set
fn exhaustive_cost(width: usize, outputs: &[Output]) -> (usize, usize) {
    let on = indices_of(outputs, Output::On);
    let on: Vec<u32> = on.into_iter().collect();

    // One trit per variable, most significant first: 0, 1 or 2 for absent
    let mut terms: Vec<(usize, usize)> = Vec::new();
    for code in 0..3usize.pow(width as u32) {
        let trits: Vec<usize> = (0..width).map(|v| code / 3usize.pow(v as u32) % 3).collect();
        let matches = |index: u32| {
            (0..width).all(|v| {
                let bit = ((index >> (width - 1 - v)) & 1) as usize;
                trits[v] == 2 || trits[v] == bit
            })
        };
        let touches_off = outputs
            .iter()
            .enumerate()
            .any(|(index, &o)| o == Output::Off && matches(index as u32));
        if touches_off {
            continue;
        }
        let mut cover = 0usize;
        for (bit, &index) in on.iter().enumerate() {
            if matches(index) {
                cover |= 1 << bit;
            }
        }
        if cover != 0 {
            terms.push((cover, trits.iter().filter(|&&t| t != 2).count()));
        }
    }

    let full = (1usize << on.len()) - 1;
    let mut best: Vec<Option<(usize, usize)>> = vec![None; full + 1];
    best[0] = Some((0, 0));
    for state in 0..=full {
        let Some((count, literals)) = best[state] else {
            continue;
        };
        for &(cover, term_literals) in &terms {
            let next = state | cover;
            let candidate = (count + 1, literals + term_literals);
            if next != state && best[next].map_or(true, |known| candidate < known) {
                best[next] = Some(candidate);
            }
        }
    }
    best[full].unwrap_or((usize::MAX, usize::MAX))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_minimal_forms_are_sound((variables, outputs) in function_strategy(4)) {
        let on = indices_of(&outputs, Output::On);
        let dont_care = indices_of(&outputs, Output::DontCare);
        let minimizer = Minimizer::new(&on, &dont_care, variables.clone()).unwrap();

        let forms = minimizer.minimal_forms_as_expressions();
        prop_assert!(!forms.is_empty());
        for form in &forms {
            for (index, output) in outputs.iter().enumerate() {
                if *output == Output::DontCare {
                    continue;
                }
                let value = Assignment::from_index(&variables, index as u32)
                    .evaluate(form)
                    .unwrap();
                prop_assert_eq!(value, *output == Output::On, "form {} at index {}", form, index);
            }
        }
    }

    #[test]
    fn test_minimal_forms_share_one_cost((variables, outputs) in function_strategy(4)) {
        let on = indices_of(&outputs, Output::On);
        let dont_care = indices_of(&outputs, Output::DontCare);
        let minimizer = Minimizer::new(&on, &dont_care, variables).unwrap();

        let costs: BTreeSet<(usize, usize)> = minimizer
            .minimal_forms()
            .iter()
            .map(|form| (form.len(), form.iter().map(|m| m.literal_count()).sum()))
            .collect();
        prop_assert!(costs.len() <= 1);
    }

    #[test]
    fn test_minimal_forms_match_exhaustive_search((variables, outputs) in function_strategy(3)) {
        let on = indices_of(&outputs, Output::On);
        let dont_care = indices_of(&outputs, Output::DontCare);
        let minimizer = Minimizer::new(&on, &dont_care, variables.clone()).unwrap();

        let forms = minimizer.minimal_forms();
        let cost = (
            forms[0].len(),
            forms[0].iter().map(|m| m.literal_count()).sum::<usize>(),
        );
        prop_assert_eq!(cost, exhaustive_cost(variables.len(), &outputs));
    }

    #[test]
    fn test_primes_never_cover_a_zero((variables, outputs) in function_strategy(4)) {
        let on = indices_of(&outputs, Output::On);
        let dont_care = indices_of(&outputs, Output::DontCare);
        let minimizer = Minimizer::new(&on, &dont_care, variables).unwrap();

        for prime in minimizer.prime_implicants() {
            for index in prime.covered() {
                prop_assert!(on.contains(index) || dont_care.contains(index));
            }
        }
    }

    #[test]
    fn test_word_form_parses_back((variables, outputs) in function_strategy(4)) {
        let on = indices_of(&outputs, Output::On);
        let minimizer = Minimizer::new(&on, &BTreeSet::new(), variables.clone()).unwrap();

        for text in minimizer.minimal_forms_as_strings(OperatorStyle::Word) {
            let reparsed = parse_expression(&text).unwrap();
            prop_assert_eq!(minterms(&reparsed, &variables).unwrap(), on.clone());
        }
    }
}
