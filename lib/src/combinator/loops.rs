use super::{Clause, LoopSignature};
use crate::descriptors::{FieldType, MethodType, ValueKind};
use crate::error::Error;
use crate::names::BinaryName;
use log::debug;

/// Resolve the composite signature of a generic loop
///
/// Checks run in a fixed order and the first violation wins: empty input,
/// empty clauses, per-clause init/step state agreement, init parameter
/// reconciliation, finalizer return agreement, predicate presence and
/// shape, then step/predicate/finalizer parameter reconciliation. The
/// reported reason embeds the offending rendered signatures.
pub fn resolve_loop(clauses: &[Clause]) -> Result<LoopSignature, Error> {
    if clauses.is_empty() {
        return Err(invalid(String::from("null or no clauses passed")));
    }
    for (index, clause) in clauses.iter().enumerate() {
        if clause.is_empty() {
            return Err(invalid(format!(
                "all clause fragments are absent in clause {}",
                index
            )));
        }
    }

    // A clause's init and step produce the same state variable
    for (index, clause) in clauses.iter().enumerate() {
        if let (Some(init), Some(step)) = (&clause.init, &clause.step) {
            if !return_kinds_match(init.return_type.as_ref(), step.return_type.as_ref()) {
                return Err(invalid(format!(
                    "clause {}: init and step return types must match: {} != {}",
                    index,
                    render_return(init.return_type.as_ref()),
                    render_return(step.return_type.as_ref()),
                )));
            }
        }
    }

    // Init fragments all draw from the loop's external arguments
    let inits: Vec<&MethodType> = clauses.iter().filter_map(|c| c.init.as_ref()).collect();
    if !inits.is_empty() && !right_aligned_consistent(&inits) {
        return Err(invalid(format!(
            "found non-effectively identical init parameter type lists: {} (common suffix: {})",
            render_present(&inits),
            render_parameters(&agreed_suffix(&inits)),
        )));
    }

    // Finalizers agree on the loop's return type
    let finalizers: Vec<&MethodType> = clauses.iter().filter_map(|c| c.finalizer.as_ref()).collect();
    if let Some(first) = finalizers.first() {
        let expected = first.return_type.as_ref();
        if finalizers
            .iter()
            .any(|fragment| !return_kinds_match(fragment.return_type.as_ref(), expected))
        {
            return Err(invalid(format!(
                "found non-identical finalizer return types: {} (return type: {})",
                render_present(&finalizers),
                render_return(expected),
            )));
        }
    }

    // Exactly one predicate decides continuation
    let predicate_slots: Vec<Option<&MethodType>> =
        clauses.iter().map(|c| c.predicate.as_ref()).collect();
    let predicates: Vec<&MethodType> = predicate_slots.iter().copied().flatten().collect();
    if predicates.is_empty() {
        return Err(invalid(format!(
            "no predicate found: {}",
            render_fragments(&predicate_slots)
        )));
    }
    if predicates.len() > 1 {
        return Err(invalid(format!(
            "more than one predicate found: {}",
            render_fragments(&predicate_slots)
        )));
    }
    if predicates
        .iter()
        .any(|fragment| fragment.return_type != Some(FieldType::boolean()))
    {
        return Err(invalid(format!(
            "predicates must have boolean return type: {}",
            render_fragments(&predicate_slots)
        )));
    }

    // Steps, the predicate, and finalizers share the external suffix
    let spf: Vec<&MethodType> = clauses
        .iter()
        .flat_map(|c| [c.step.as_ref(), c.predicate.as_ref(), c.finalizer.as_ref()])
        .flatten()
        .collect();
    if !right_aligned_consistent(&spf) {
        let steps: Vec<Option<&MethodType>> = clauses.iter().map(|c| c.step.as_ref()).collect();
        let finis: Vec<Option<&MethodType>> =
            clauses.iter().map(|c| c.finalizer.as_ref()).collect();
        return Err(invalid(format!(
            "found non-effectively identical parameter type lists:\nstep: {}\npred: {}\nfini: {} (common suffix: {})",
            render_fragments(&steps),
            render_fragments(&predicate_slots),
            render_fragments(&finis),
            render_parameters(&agreed_suffix(&spf)),
        )));
    }
    let externals = agreed_suffix(&spf);

    let state: Vec<FieldType> = clauses
        .iter()
        .filter_map(|clause| clause.state_type().cloned())
        .collect();
    let return_type = match finalizers.first() {
        Some(finalizer) => finalizer.return_type.clone(),
        None => clauses
            .last()
            .and_then(|clause| clause.state_type())
            .cloned(),
    };

    let signature = LoopSignature {
        state,
        externals,
        return_type,
    };
    debug!("resolved loop signature {}", signature.method_type());
    Ok(signature)
}

/// Resolve a while loop: the predicate runs before each body execution
pub fn resolve_while_loop(
    init: Option<&MethodType>,
    predicate: &MethodType,
    step: &MethodType,
) -> Result<LoopSignature, Error> {
    while_loop_signature(init, predicate, step)
}

/// Resolve a do-while loop: the body runs once before the predicate is
/// first consulted; the shape requirements are those of a while loop
pub fn resolve_do_while_loop(
    init: Option<&MethodType>,
    predicate: &MethodType,
    step: &MethodType,
) -> Result<LoopSignature, Error> {
    while_loop_signature(init, predicate, step)
}

fn while_loop_signature(
    init: Option<&MethodType>,
    predicate: &MethodType,
    step: &MethodType,
) -> Result<LoopSignature, Error> {
    let return_type = step.return_type.clone();

    // A stateful body leads with its own state; everything after it is an
    // external argument
    let externals: Vec<FieldType> = match &return_type {
        Some(state) => match step.parameters.first() {
            Some(first) if kind_eq(first, state) => step.parameters[1..].to_vec(),
            _ => {
                let mut expected = Vec::with_capacity(step.parameters.len() + 1);
                expected.push(state.clone());
                expected.extend(step.parameters.iter().cloned());
                return Err(invalid(format!(
                    "body function must match: {} != {}",
                    step,
                    MethodType::new(expected, return_type.clone()),
                )));
            }
        },
        None => step.parameters.clone(),
    };

    if predicate.return_type != Some(FieldType::boolean())
        || !kinds_match(&predicate.parameters, &step.parameters)
    {
        let expected = MethodType::new(step.parameters.clone(), Some(FieldType::boolean()));
        return Err(invalid(format!(
            "loop predicate must match: {} != {}",
            predicate, expected
        )));
    }

    if let Some(init) = init {
        if !return_kinds_match(init.return_type.as_ref(), return_type.as_ref())
            || !kinds_match(&init.parameters, &externals)
        {
            let expected = MethodType::new(externals.clone(), return_type.clone());
            return Err(invalid(format!(
                "loop initializer must match: {} != {}",
                init, expected
            )));
        }
    }

    Ok(LoopSignature {
        state: return_type.iter().cloned().collect(),
        externals,
        return_type,
    })
}

/// Resolve a counted loop running from zero up to an iteration count
pub fn resolve_counted_loop(
    iterations: &MethodType,
    init: Option<&MethodType>,
    body: &MethodType,
) -> Result<LoopSignature, Error> {
    // Zero-based counting: the synthetic start fragment mirrors the
    // iteration fragment's parameters
    let start = MethodType::new(iterations.parameters.clone(), Some(FieldType::int()));
    counted_loop_signature(&start, iterations, init, body)
}

/// Resolve a counted loop running from a start value up to an end value
pub fn resolve_counted_range_loop(
    start: &MethodType,
    end: &MethodType,
    init: Option<&MethodType>,
    body: &MethodType,
) -> Result<LoopSignature, Error> {
    counted_loop_signature(start, end, init, body)
}

fn counted_loop_signature(
    start: &MethodType,
    end: &MethodType,
    init: Option<&MethodType>,
    body: &MethodType,
) -> Result<LoopSignature, Error> {
    if start.return_type != Some(FieldType::int()) || end.return_type != Some(FieldType::int()) {
        return Err(invalid(format!(
            "start/end must return int: {}, {}",
            start, end
        )));
    }
    if !kinds_match(&start.parameters, &end.parameters) {
        return Err(invalid(format!(
            "start and end parameter types must match: {} != {}",
            start, end
        )));
    }
    if let Some(init) = init {
        if !kinds_match(&init.parameters, &start.parameters) {
            return Err(invalid(format!(
                "start/end and init parameter types must match: {} != {}",
                start, init
            )));
        }
    }

    let state = body.return_type.clone();
    let leading = if state.is_some() { 2 } else { 1 };

    // Leading body slots: the state (when present), then an exact int
    // counter
    let leading_ok = {
        let mut parameters = body.parameters.iter();
        let state_ok = match &state {
            Some(state) => parameters.next().map_or(false, |p| kind_eq(p, state)),
            None => true,
        };
        state_ok && parameters.next() == Some(&FieldType::int())
    };

    // The body names the externals itself when it goes beyond the minimal
    // (state, counter) shape; otherwise start/end supply them
    let body_external_ok = if body.parameters.len() > leading {
        start.parameters.is_empty()
            || is_kind_suffix(&start.parameters, &body.parameters[leading..])
    } else {
        body.parameters.len() == leading
    };

    if !leading_ok || !body_external_ok {
        let mut expected_parameters = Vec::with_capacity(leading + start.parameters.len());
        if let Some(state) = &state {
            expected_parameters.push(state.clone());
        }
        expected_parameters.push(FieldType::int());
        expected_parameters.extend(start.parameters.iter().cloned());
        let expected = MethodType::new(expected_parameters, state.clone());
        return Err(invalid(format!(
            "actual and expected body signatures must match: {} != {}",
            body, expected
        )));
    }

    if let Some(init) = init {
        if !return_kinds_match(init.return_type.as_ref(), state.as_ref()) {
            let expected = MethodType::new(init.parameters.clone(), state.clone());
            return Err(invalid(format!(
                "loop initializer must match: {} != {}",
                init, expected
            )));
        }
    }

    let externals = if body.parameters.len() > leading {
        body.parameters[leading..].to_vec()
    } else {
        start.parameters.clone()
    };

    Ok(LoopSignature {
        state: state.iter().cloned().collect(),
        externals,
        return_type: state,
    })
}

/// Resolve an iterated loop from an iterator factory, a state initializer,
/// and a body
///
/// With no iterator fragment the loop draws an iterator from its first
/// external argument, which must then be an iterable reference type.
pub fn resolve_iterated_loop(
    iterator: Option<&MethodType>,
    init: Option<&MethodType>,
    body: &MethodType,
) -> Result<LoopSignature, Error> {
    if let Some(iterator) = iterator {
        let returns_iterator = matches!(
            &iterator.return_type,
            Some(FieldType::Object(name)) if *name == BinaryName::ITERATOR
        );
        if !returns_iterator {
            return Err(invalid(String::from(
                "iteratedLoop first argument must have Iterator return type",
            )));
        }
    }
    if let (Some(iterator), Some(init)) = (iterator, init) {
        if !kinds_match(&iterator.parameters, &init.parameters) {
            return Err(invalid(format!(
                "iterator and init parameter lists must match: {} != {}",
                iterator, init
            )));
        }
    }

    let state = body.return_type.clone();
    let leading = if state.is_some() { 2 } else { 1 };

    let externals: Vec<FieldType> = match (iterator, init) {
        (Some(iterator), _) => iterator.parameters.clone(),
        (None, Some(init)) => init.parameters.clone(),
        (None, None) => {
            if body.parameters.len() > leading {
                body.parameters[leading..].to_vec()
            } else {
                vec![]
            }
        }
    };

    // Default iterator: iterate over the first external argument
    if iterator.is_none() {
        let iterable_ok = externals
            .first()
            .map_or(false, |argument| argument.kind() == ValueKind::Reference);
        if !iterable_ok {
            return Err(invalid(format!(
                "inferred iterator argument must be an iterable reference type: {}",
                render_parameters(&externals),
            )));
        }
    }

    // Leading body slots: the state (when present) and the current element,
    // a reference; the trailing run matches the agreed externals
    let leading_ok = body.parameters.len() >= leading && {
        let state_ok = match &state {
            Some(state) => kind_eq(&body.parameters[0], state),
            None => true,
        };
        state_ok && body.parameters[leading - 1].kind() == ValueKind::Reference
    };
    let trailing_ok = body.parameters.len() >= leading && {
        let trailing = &body.parameters[leading..];
        trailing.is_empty() || kinds_match(trailing, &externals)
    };

    if !leading_ok || !trailing_ok {
        let mut expected_parameters = Vec::with_capacity(leading + externals.len());
        if let Some(state) = &state {
            expected_parameters.push(state.clone());
        }
        expected_parameters.push(
            body.parameters
                .get(leading - 1)
                .cloned()
                .unwrap_or_else(|| FieldType::object(BinaryName::OBJECT)),
        );
        expected_parameters.extend(externals.iter().cloned());
        let expected = MethodType::new(expected_parameters, state.clone());
        return Err(invalid(format!(
            "body types must match: {} != {}",
            body, expected
        )));
    }

    Ok(LoopSignature {
        state: state.iter().cloned().collect(),
        externals,
        return_type: state,
    })
}

fn invalid(reason: String) -> Error {
    Error::InvalidArgument(reason)
}

fn kind_eq(a: &FieldType, b: &FieldType) -> bool {
    a.kind() == b.kind()
}

fn return_kinds_match(a: Option<&FieldType>, b: Option<&FieldType>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => kind_eq(a, b),
        _ => false,
    }
}

fn kinds_match(a: &[FieldType], b: &[FieldType]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| kind_eq(a, b))
}

/// Is `shorter` a kind-wise suffix of `longer`?
fn is_kind_suffix(shorter: &[FieldType], longer: &[FieldType]) -> bool {
    match longer.len().checked_sub(shorter.len()) {
        Some(offset) => shorter
            .iter()
            .zip(&longer[offset..])
            .all(|(a, b)| kind_eq(a, b)),
        None => false,
    }
}

fn longest_fragment<'a>(fragments: &[&'a MethodType]) -> &'a MethodType {
    fragments
        .iter()
        .copied()
        .max_by_key(|fragment| fragment.parameters.len())
        .expect("at least one fragment")
}

/// Every fragment's parameter list right-aligns against the longest one
fn right_aligned_consistent(fragments: &[&MethodType]) -> bool {
    let longest = longest_fragment(fragments);
    fragments
        .iter()
        .all(|fragment| is_kind_suffix(&fragment.parameters, &longest.parameters))
}

/// Longest trailing parameter run on which every fragment agrees, bounded
/// by the shortest fragment; concrete types are drawn from the longest one
fn agreed_suffix(fragments: &[&MethodType]) -> Vec<FieldType> {
    let longest = longest_fragment(fragments);
    let shortest_len = fragments
        .iter()
        .map(|fragment| fragment.parameters.len())
        .min()
        .unwrap_or(0);

    let mut agreed = 0;
    while agreed < shortest_len {
        let reference = &longest.parameters[longest.parameters.len() - 1 - agreed];
        let all_agree = fragments.iter().all(|fragment| {
            kind_eq(
                &fragment.parameters[fragment.parameters.len() - 1 - agreed],
                reference,
            )
        });
        if !all_agree {
            break;
        }
        agreed += 1;
    }
    longest.parameters[longest.parameters.len() - agreed..].to_vec()
}

fn render_return(typ: Option<&FieldType>) -> String {
    typ.map(|t| t.to_string()).unwrap_or_else(|| String::from("V"))
}

fn render_fragments(fragments: &[Option<&MethodType>]) -> String {
    let rendered: Vec<String> = fragments
        .iter()
        .map(|fragment| {
            fragment
                .map(|t| t.to_string())
                .unwrap_or_else(|| String::from("none"))
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

fn render_present(fragments: &[&MethodType]) -> String {
    let rendered: Vec<String> = fragments.iter().map(|t| t.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

fn render_parameters(parameters: &[FieldType]) -> String {
    let mut out = String::from("(");
    for parameter in parameters {
        out.push_str(&parameter.to_string());
    }
    out.push(')');
    out
}
