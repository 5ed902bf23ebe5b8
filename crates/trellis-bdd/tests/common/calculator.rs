//! Calculator world and step definitions shared by the feature tests.

use camino::Utf8PathBuf;
use trellis_bdd::{Feature, Multiline, StepError, StepRegistry};

/// World threaded through every scenario of a run.
#[derive(Debug, Default)]
pub struct Calculator {
    pub result: i64,
    pub note: Vec<String>,
    pub trace: Vec<String>,
}

/// Load a fixture from `tests/features`.
pub fn load(name: &str) -> Feature {
    let path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("features")
        .join(name);
    Feature::from_path(&path).unwrap_or_else(|e| panic!("fixture {path} should load: {e}"))
}

/// Steps understood by the arithmetic fixtures.
pub fn calculator_steps() -> StepRegistry<Calculator> {
    let mut steps = StepRegistry::<Calculator>::new();
    steps
        .step(r"I add (\d+) and (\d+)", |ctx, args| {
            let sum = args.parse::<i64>(0)? + args.parse::<i64>(1)?;
            let world = ctx.world_mut();
            world.result = sum;
            world.trace.push(format!("add -> {sum}"));
            Ok(())
        })
        .and_then(|s| {
            s.step(r"I subtract (\d+) from (\d+)", |ctx, args| {
                let difference = args.parse::<i64>(1)? - args.parse::<i64>(0)?;
                ctx.world_mut().result = difference;
                Ok(())
            })
        })
        .and_then(|s| {
            s.step(r"the result should be (-?\d+)", |ctx, args| {
                let expected = args.parse::<i64>(0)?;
                let actual = ctx.world().result;
                assert_eq!(actual, expected, "expected {expected}, got {actual}");
                Ok(())
            })
        })
        .and_then(|s| {
            s.step_multiline("the note", Multiline::from("note"), |ctx, args| {
                let note = args
                    .named("note")
                    .ok_or_else(|| StepError::error("note text missing"))?;
                ctx.world_mut().note = note.lines().map(|l| l.trim().to_string()).collect();
                Ok(())
            })
        })
        .and_then(|s| {
            s.step(r"the note has (\d+) lines", |ctx, args| {
                let expected = args.parse::<usize>(0)?;
                if ctx.world().note.len() == expected {
                    Ok(())
                } else {
                    Err(StepError::failure(format!(
                        "note has {} lines",
                        ctx.world().note.len()
                    )))
                }
            })
        })
        .unwrap_or_else(|e| panic!("calculator patterns should compile: {e}"));
    steps
}
