//! This module provides the parser for the session protocol, utilizing the `pest` crate.
//! It defines the grammar in `grammar.pest` and turns a protocol text into a built
//! `TransitionTable`, a step budget and the inputs to run.

use crate::{
    explorer::RunContext,
    machine::TransitionTable,
    types::{Direction, MachineError, StateId, Symbol, MAX_PROGRAM_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the protocol grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ProtocolParser;

/// A parsed session: the machine, its step budget and the inputs of the run section.
#[derive(Debug, Clone, PartialEq)]
pub struct Protocol {
    /// The built, read-only transition table.
    pub machine: TransitionTable,
    /// Maximum number of synchronized steps per run.
    pub max_steps: u64,
    /// One input string per run, in order. Empty when the protocol has no `run` section.
    pub inputs: Vec<String>,
}

impl Protocol {
    /// Returns the run context described by this protocol.
    pub fn context(&self) -> RunContext {
        RunContext::new(self.max_steps)
    }
}

/// Parses the given protocol text into a `Protocol`.
///
/// # Arguments
///
/// * `input` - A string slice containing the protocol.
///
/// # Returns
///
/// * `Ok(Protocol)` if the input is successfully parsed and the machine could be built.
/// * `Err(MachineError::ParseError)` for syntax errors, unsupported symbols, out of range
///   numbers and acceptors naming unknown states.
/// * `Err(MachineError::ValidationError)` if the input is too large.
pub fn parse(input: &str) -> Result<Protocol, MachineError> {
    if input.len() > MAX_PROGRAM_SIZE {
        return Err(MachineError::ValidationError(format!(
            "Protocol is {} bytes, the limit is {MAX_PROGRAM_SIZE}",
            input.len()
        )));
    }

    let root = ProtocolParser::parse(Rule::protocol, input.trim())
        .map_err(|e| MachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| MachineError::ValidationError("Empty protocol".into()))?;

    parse_protocol(root)
}

/// Walks the sections of a `Pair<Rule::protocol>` in order, building the machine as it goes.
fn parse_protocol(pair: Pair<Rule>) -> Result<Protocol, MachineError> {
    let mut machine = TransitionTable::new();
    let mut max_steps = 0;
    let mut inputs = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::transitions => {
                for transition in p.into_inner() {
                    parse_transition(transition, &mut machine)?;
                }
            }
            Rule::acceptors => {
                for state in p.into_inner() {
                    let span = state.as_span();
                    let id = parse_state(&state)?;
                    machine
                        .mark_acceptor(id)
                        .map_err(|_| parse_error(&format!("Unknown acceptor state: {id}"), span))?;
                }
            }
            Rule::budget => {
                max_steps = p
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| parse_error("Step budget out of range", p.as_span()))?;
            }
            Rule::run => inputs = p.into_inner().map(|i| i.as_str().to_string()).collect(),
            _ => {} // EOI
        }
    }

    Ok(Protocol {
        machine,
        max_steps,
        inputs,
    })
}

/// Parses one `state in out direction next` record and declares it on `machine`.
fn parse_transition(pair: Pair<Rule>, machine: &mut TransitionTable) -> Result<(), MachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    let state = parse_state(&next_pair(&mut pairs, span)?)?;
    let read = parse_symbol(&next_pair(&mut pairs, span)?);
    let write = parse_symbol(&next_pair(&mut pairs, span)?);
    let direction = parse_direction(&next_pair(&mut pairs, span)?)?;
    let next_state = parse_state(&next_pair(&mut pairs, span)?)?;

    machine
        .declare_transition(state, read, write, direction, next_state)
        .map_err(|e| parse_error(&e.to_string(), span))
}

/// Parses a state id from a `Pair<Rule::state>`.
fn parse_state(pair: &Pair<Rule>) -> Result<StateId, MachineError> {
    pair.as_str()
        .parse::<StateId>()
        .map_err(|_| parse_error("State id out of range", pair.as_span()))
}

/// Parses a single direction from a `Pair<Rule::direction>`.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, MachineError> {
    let c = pair.as_str().chars().next().unwrap_or_default();
    Direction::try_from(c).map_err(|e| parse_error(&e.to_string(), pair.as_span()))
}

/// Parses a single character symbol from a `Pair<Rule::symbol>`.
fn parse_symbol(pair: &Pair<Rule>) -> Symbol {
    pair.as_str().chars().next().unwrap_or_default()
}

/// Takes the next field of a record, failing with the record's span if the tree is short.
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, span: Span<'i>) -> Result<Pair<'i, Rule>, MachineError> {
    pairs
        .next()
        .ok_or_else(|| parse_error("Incomplete transition", span))
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
