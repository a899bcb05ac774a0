#![forbid(unsafe_code)]

use jolyglot_core::SpeakerOptions;
use jolyglot_simd_json::SimdJsonSpeaker;
use jolyglot_suite::{CaseOutcome, base_cases, generic_cases};
use libtest_mimic::{Arguments, Failed, Trial};

fn main() {
    jolyglot_testhelpers::setup();

    let args = Arguments::from_args();
    let make = SimdJsonSpeaker::with_options as fn(SpeakerOptions) -> SimdJsonSpeaker;
    let trials: Vec<Trial> = base_cases(make)
        .into_iter()
        .map(|case| ("base", case))
        .chain(generic_cases(make).into_iter().map(|case| ("generic", case)))
        .map(|(group, case)| {
            let name = format!("simd_json::{group}::{}", case.id);
            Trial::test(name, move || match case.run() {
                CaseOutcome::Passed => Ok(()),
                CaseOutcome::Failed(msg) => Err(Failed::from(msg)),
            })
        })
        .collect();

    libtest_mimic::run(&args, trials).exit()
}
