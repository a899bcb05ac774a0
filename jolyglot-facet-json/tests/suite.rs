#![forbid(unsafe_code)]

use jolyglot_core::SpeakerOptions;
use jolyglot_facet_json::FacetJsonSpeaker;
use jolyglot_suite::{CaseOutcome, base_cases};
use libtest_mimic::{Arguments, Failed, Trial};

fn main() {
    jolyglot_testhelpers::setup();

    let args = Arguments::from_args();
    let trials: Vec<Trial> = base_cases(FacetJsonSpeaker::with_options)
        .into_iter()
        .map(|case| {
            let name = format!("facet_json::base::{}", case.id);
            Trial::test(name, move || match case.run() {
                CaseOutcome::Passed => Ok(()),
                CaseOutcome::Failed(msg) => Err(Failed::from(msg)),
            })
        })
        .collect();

    libtest_mimic::run(&args, trials).exit()
}
