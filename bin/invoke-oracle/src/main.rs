use invoke_oracle::combinator::{
    resolve_counted_loop, resolve_counted_range_loop, resolve_do_while_loop, resolve_iterated_loop,
    resolve_loop, resolve_while_loop, Clause, LoopSignature,
};
use invoke_oracle::{Error, MethodType};

use clap::{Arg, ArgAction, Command};
use std::process;

fn main() {
    env_logger::init();

    match run() {
        Ok(signature) => println!("{}", signature.method_type()),
        Err(Error::InvalidArgument(reason)) => {
            eprintln!("{}", reason);
            process::exit(1);
        }
        Err(err) => {
            eprintln!("{:?}", err);
            process::exit(1);
        }
    }
}

fn run() -> Result<LoopSignature, Error> {
    let matches = Command::new("invoke-oracle")
        .version("0.1.0")
        .about("Predict composite loop signatures from method descriptor fragments")
        .subcommand_required(true)
        .subcommand(
            Command::new("loop")
                .about("Resolve a generic loop from clauses")
                .arg(
                    Arg::new("clause")
                        .long("clause")
                        .value_name("INIT,STEP,PRED,FINI")
                        .action(ArgAction::Append)
                        .required(true)
                        .help("One clause of descriptor fragments; use `_` for an absent fragment"),
                ),
        )
        .subcommand(
            Command::new("while")
                .about("Resolve a while loop (predicate runs first)")
                .arg(Arg::new("init").required(true).help("Initializer descriptor, or `_`"))
                .arg(Arg::new("pred").required(true).help("Predicate descriptor"))
                .arg(Arg::new("step").required(true).help("Body descriptor")),
        )
        .subcommand(
            Command::new("do-while")
                .about("Resolve a do-while loop (body runs first)")
                .arg(Arg::new("init").required(true).help("Initializer descriptor, or `_`"))
                .arg(Arg::new("pred").required(true).help("Predicate descriptor"))
                .arg(Arg::new("step").required(true).help("Body descriptor")),
        )
        .subcommand(
            Command::new("counted")
                .about("Resolve a counted loop")
                .arg(
                    Arg::new("start")
                        .required(true)
                        .help("Start descriptor, or `_` to count from zero"),
                )
                .arg(Arg::new("end").required(true).help("End / iteration count descriptor"))
                .arg(Arg::new("init").required(true).help("Initializer descriptor, or `_`"))
                .arg(Arg::new("body").required(true).help("Body descriptor")),
        )
        .subcommand(
            Command::new("iterated")
                .about("Resolve an iterated loop")
                .arg(
                    Arg::new("iterator")
                        .required(true)
                        .help("Iterator factory descriptor, or `_` for the default"),
                )
                .arg(Arg::new("init").required(true).help("Initializer descriptor, or `_`"))
                .arg(Arg::new("body").required(true).help("Body descriptor")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("loop", sub)) => {
            let mut clauses = vec![];
            for raw in sub.get_many::<String>("clause").expect("required") {
                clauses.push(parse_clause(raw)?);
            }
            log::info!("resolving generic loop with {} clauses", clauses.len());
            resolve_loop(&clauses)
        }
        Some(("while", sub)) => {
            let init = fragment(sub.get_one::<String>("init").expect("required"))?;
            let pred = required_fragment(sub.get_one::<String>("pred").expect("required"), "predicate")?;
            let step = required_fragment(sub.get_one::<String>("step").expect("required"), "body")?;
            resolve_while_loop(init.as_ref(), &pred, &step)
        }
        Some(("do-while", sub)) => {
            let init = fragment(sub.get_one::<String>("init").expect("required"))?;
            let pred = required_fragment(sub.get_one::<String>("pred").expect("required"), "predicate")?;
            let step = required_fragment(sub.get_one::<String>("step").expect("required"), "body")?;
            resolve_do_while_loop(init.as_ref(), &pred, &step)
        }
        Some(("counted", sub)) => {
            let start = fragment(sub.get_one::<String>("start").expect("required"))?;
            let end = required_fragment(sub.get_one::<String>("end").expect("required"), "end")?;
            let init = fragment(sub.get_one::<String>("init").expect("required"))?;
            let body = required_fragment(sub.get_one::<String>("body").expect("required"), "body")?;
            match start {
                Some(start) => resolve_counted_range_loop(&start, &end, init.as_ref(), &body),
                None => resolve_counted_loop(&end, init.as_ref(), &body),
            }
        }
        Some(("iterated", sub)) => {
            let iterator = fragment(sub.get_one::<String>("iterator").expect("required"))?;
            let init = fragment(sub.get_one::<String>("init").expect("required"))?;
            let body = required_fragment(sub.get_one::<String>("body").expect("required"), "body")?;
            resolve_iterated_loop(iterator.as_ref(), init.as_ref(), &body)
        }
        _ => unreachable!("subcommand is required"),
    }
}

/// `_` stands for an absent fragment
fn fragment(raw: &str) -> Result<Option<MethodType>, Error> {
    if raw == "_" {
        Ok(None)
    } else {
        MethodType::parse(raw).map(Some)
    }
}

fn required_fragment(raw: &str, what: &str) -> Result<MethodType, Error> {
    if raw == "_" {
        Err(Error::InvalidArgument(format!(
            "the {} fragment cannot be absent",
            what
        )))
    } else {
        MethodType::parse(raw)
    }
}

fn parse_clause(raw: &str) -> Result<Clause, Error> {
    let slots: Vec<&str> = raw.split(',').collect();
    if slots.len() > 4 {
        return Err(Error::InvalidArgument(format!(
            "clause '{}' has more than 4 fragments",
            raw
        )));
    }

    let mut clause = Clause::new();
    if let Some(init) = slots.first().copied().map(fragment).transpose()?.flatten() {
        clause = clause.init(init);
    }
    if let Some(step) = slots.get(1).copied().map(fragment).transpose()?.flatten() {
        clause = clause.step(step);
    }
    if let Some(pred) = slots.get(2).copied().map(fragment).transpose()?.flatten() {
        clause = clause.predicate(pred);
    }
    if let Some(fini) = slots.get(3).copied().map(fragment).transpose()?.flatten() {
        clause = clause.finalizer(fini);
    }
    Ok(clause)
}
