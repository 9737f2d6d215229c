use rulebench::FixtureProfile;
use std::process::ExitCode;

fn main() -> ExitCode {
    rulebench::run(FixtureProfile::new()).into()
}
