//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::hint::black_box;
use std::time::{Duration, Instant};

use fauxbuild_core::convention::{self, NamingConvention};
use fauxbuild_core::{BuilderError, ContractDescription, Operation, Value, ValueType};

use crate::config::FactoryConfig;
use crate::demo::{self, Example, ExampleBuilder, ExampleBuilderContract, ManualBuilder};
use crate::factory::BuilderFactory;
use crate::proxy::{BuilderProxy, TerminalPolicy};

use super::{CliError, CliResult, DemoBuilder, ExitCode};

/// Objects built per bench round when no count is given.
pub const DEFAULT_COUNTS: [usize; 7] = [3_000, 5_000, 10_000, 20_000, 40_000, 80_000, 150_000];

// ============================================================================
// demo
// ============================================================================

/// Arguments of the `demo` command.
#[derive(Debug, Clone)]
pub struct DemoRequest {
    pub builder: DemoBuilder,
    pub mandatory: String,
    pub optional1: Option<i32>,
    pub optional2: Option<char>,
    /// Extra zero-argument operation for the dynamic builder
    pub call: Option<String>,
    pub builds: usize,
    pub reusable: bool,
}

impl DemoRequest {
    fn config(&self) -> FactoryConfig {
        let policy = if self.reusable {
            TerminalPolicy::Reusable
        } else {
            TerminalPolicy::SingleUse
        };
        FactoryConfig::new().with_terminal_policy(policy)
    }
}

/// Build the example object and print it once per terminal call.
pub fn demo(request: &DemoRequest) -> CliResult<ExitCode> {
    if request.call.is_some() && request.builder != DemoBuilder::Dynamic {
        return Err(CliError::failure("--call only applies to the dynamic builder"));
    }
    tracing::debug!(builder = ?request.builder, builds = request.builds, "demo");

    match request.builder {
        DemoBuilder::Dynamic => demo_dynamic(request)?,
        DemoBuilder::Typed => demo_typed(request)?,
        DemoBuilder::Manual => demo_manual(request),
    }
    Ok(ExitCode::SUCCESS)
}

fn demo_dynamic(request: &DemoRequest) -> CliResult<()> {
    let factory = BuilderFactory::with_config(request.config().with_convention(NamingConvention::Simple));
    let mut builder = factory
        .create_reflective::<Example>(demo::example_contract(), vec![Value::from(request.mandatory.as_str())])
        .map_err(CliError::diagnostic)?;

    if let Some(value) = request.optional1 {
        builder.write("optional1", value).map_err(CliError::diagnostic)?;
    }
    if let Some(value) = request.optional2 {
        builder.write("optional2", value).map_err(CliError::diagnostic)?;
    }
    if let Some(operation) = &request.call {
        let reply = builder.dispatch(operation, Vec::new()).map_err(CliError::diagnostic)?;
        match reply.into_value() {
            Some(value) => println!("{operation}() = {value}"),
            None => println!("{operation}() answered nothing"),
        }
    }
    tracing::info!(slots = %builder, "builder populated");

    for _ in 0..request.builds {
        let example = builder.build().map_err(CliError::diagnostic)?;
        println!("{example}");
    }
    Ok(())
}

fn demo_typed(request: &DemoRequest) -> CliResult<()> {
    let mandatory = request.mandatory.clone();
    let factory = BuilderFactory::with_config(request.config());
    let mut builder = factory
        .make_typed::<ExampleBuilderContract, Example, BuilderError, _>(move |b| {
            Ok(Example::new(mandatory.clone(), b.optional1(), b.optional2()))
        })
        .map_err(CliError::diagnostic)?;

    if let Some(value) = request.optional1 {
        builder.set_optional1(value).map_err(CliError::diagnostic)?;
    }
    if let Some(value) = request.optional2 {
        builder.set_optional2(value).map_err(CliError::diagnostic)?;
    }
    tracing::info!(slots = %builder, "builder populated");

    for _ in 0..request.builds {
        let example = ExampleBuilder::build(&mut builder).map_err(CliError::diagnostic)?;
        println!("{example}");
    }
    Ok(())
}

fn demo_manual(request: &DemoRequest) {
    let mut builder = ManualBuilder::new(request.mandatory.clone());
    if let Some(value) = request.optional1 {
        builder.optional1(value);
    }
    if let Some(value) = request.optional2 {
        builder.optional2(value);
    }
    for _ in 0..request.builds {
        println!("{}", builder.build());
    }
}

// ============================================================================
// bench
// ============================================================================

/// One timed way of building the example object.
struct Contender {
    name: &'static str,
    build: Box<dyn FnMut() -> Result<Example, BuilderError>>,
}

/// Time every builder over each count and print one row per builder and count.
pub fn bench(counts: &[usize]) -> CliResult<ExitCode> {
    if counts.contains(&0) {
        return Err(CliError::failure("bench counts must be positive"));
    }

    let factory = BuilderFactory::new(NamingConvention::Simple);
    let prepared = factory
        .register(demo::example_contract())
        .map_err(CliError::diagnostic)?;

    let mut contenders = vec![
        Contender {
            name: "proxy",
            build: Box::new(|| -> Result<Example, BuilderError> {
                let mut builder = Example::builder("X")?;
                builder.write("optional1", 35)?.write("optional2", 'A')?;
                builder.build()
            }),
        },
        Contender {
            name: "prepared",
            build: Box::new(move || -> Result<Example, BuilderError> {
                let mut builder = factory.make(&prepared, from_slots);
                builder.write("optional1", 35)?.write("optional2", 'A')?;
                builder.build()
            }),
        },
        Contender {
            name: "typed",
            build: Box::new(|| -> Result<Example, BuilderError> {
                let mut builder = Example::typed_builder("X")?;
                builder.set_optional1(35)?.set_optional2('A')?;
                ExampleBuilder::build(&mut builder)
            }),
        },
        Contender {
            name: "manual",
            build: Box::new(|| -> Result<Example, BuilderError> {
                Ok(ManualBuilder::new("X").optional1(35).optional2('A').build())
            }),
        },
    ];

    println!("{:>10}{:>13}{:>8}", "builder", "objects", "ms");
    for &count in counts {
        for contender in &mut contenders {
            let elapsed = time(count, &mut *contender.build)?;
            println!(
                "{:>10}{:>13}{:>8}ms",
                contender.name,
                group_thousands(count),
                elapsed.as_millis()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Terminal callback for the prepared contract.
fn from_slots(builder: &BuilderProxy<Example>) -> Result<Example, BuilderError> {
    Ok(Example::new("X", builder.get("optional1")?, builder.get("optional2")?))
}

fn time(count: usize, build: &mut dyn FnMut() -> Result<Example, BuilderError>) -> CliResult<Duration> {
    let start = Instant::now();
    for _ in 0..count {
        black_box(build().map_err(CliError::diagnostic)?);
    }
    Ok(start.elapsed())
}

/// Render `150000` as `150,000`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// conventions
// ============================================================================

/// Print every registered convention and how it classifies a few sample operations.
pub fn conventions() -> CliResult<ExitCode> {
    let sample = ContractDescription::new("ColorBuilder", "Color").terminal("build");
    let samples = [
        (Operation::writer("color", ValueType::Int), 1),
        (Operation::reader("color", ValueType::Int), 0),
        (
            Operation::writer(format!("{}color", convention::WRITER_PREFIX), ValueType::Int),
            1,
        ),
        (
            Operation::reader(format!("{}color", convention::READER_PREFIX), ValueType::Int),
            0,
        ),
    ];

    for info in convention::CONVENTIONS {
        if info.aliases.is_empty() {
            println!("{}", info.canonical);
        } else {
            println!("{} (aliases: {})", info.canonical, info.aliases.join(", "));
        }
        println!("    {}", info.description);
        for (op, arity) in &samples {
            let role = info.id.classify(&sample, op, *arity);
            println!("    {:<22}{}", op.signature(), role);
        }
    }
    Ok(ExitCode::SUCCESS)
}
