use bx_core::NodeShape;
use chumsky::prelude::*;

use crate::ParseResult;
use crate::graph_builder::GraphBuilder;

/// A node term as written in the source: bare id or id plus shape delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AstNode {
    id: String,
    label: Option<String>,
    shape: Option<NodeShape>,
}

/// One statement: a head node followed by zero or more `--> |label|? node`
/// links. A chain of N links lowers to N edges, so multiple edges per line
/// are all captured.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chain {
    head: AstNode,
    links: Vec<(Option<String>, AstNode)>,
}

pub(crate) fn parse(input: &str) -> ParseResult {
    let mut builder = GraphBuilder::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed) || is_header(trimmed) {
            continue;
        }

        let mut parsed_line = false;
        for statement in trimmed.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                parsed_line = true;
                continue;
            }

            let (chain, errors) = chain_parser().parse(statement).into_output_errors();
            if errors.is_empty() {
                if let Some(chain) = chain {
                    lower_chain(&chain, &mut builder);
                    parsed_line = true;
                }
            }
        }

        if !parsed_line {
            builder.add_warning(format!(
                "Line {line_number}: unsupported flowchart syntax: {trimmed}"
            ));
        }
    }

    if builder.node_count() == 0 && builder.edge_count() == 0 {
        builder.add_warning("No parseable nodes or edges were found");
    }

    builder.finish()
}

/// `%%` comment line.
fn is_comment(line: &str) -> bool {
    line.starts_with("%%")
}

/// The `graph TD` / `flowchart LR` declaration line. Matched on the first
/// word so node ids like `graphics` are not swallowed.
fn is_header(line: &str) -> bool {
    match line.split_whitespace().next() {
        Some(word) => {
            let lower = word.to_ascii_lowercase();
            lower == "graph" || lower == "flowchart"
        }
        None => false,
    }
}

fn lower_chain(chain: &Chain, builder: &mut GraphBuilder) {
    // A bare identifier on its own declares nothing; nodes enter the graph
    // through shape delimiters or by being an edge endpoint.
    if chain.links.is_empty() && chain.head.shape.is_none() {
        return;
    }

    let mut from = builder.intern_node(
        &chain.head.id,
        chain.head.label.as_deref(),
        chain.head.shape,
    );

    for (label, to_ast) in &chain.links {
        let to = builder.intern_node(&to_ast.id, to_ast.label.as_deref(), to_ast.shape);
        if let (Some(f), Some(t)) = (from, to) {
            builder.push_edge(f, t, label.as_deref());
        }
        from = to;
    }
}

/// Build a chumsky parser for a single flowchart statement.
///
/// Shape delimiters are tried longest-first so `((` wins over `(` and `[(`
/// over `[`; adding a shape means adding one entry to the choice.
fn chain_parser<'a>() -> impl Parser<'a, &'a str, Chain, extra::Err<Rich<'a, char>>> {
    let ws_char = any().filter(|c: &char| *c == ' ' || *c == '\t');
    let inline_ws = ws_char.repeated().to(());

    let ident = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice();

    let circle = just("((")
        .ignore_then(any().and_is(just("))").not()).repeated().to_slice())
        .then_ignore(just("))"));

    let cylinder = just("[(")
        .ignore_then(any().and_is(just(")]").not()).repeated().to_slice())
        .then_ignore(just(")]"));

    let hexagon = just("{{")
        .ignore_then(any().and_is(just("}}").not()).repeated().to_slice())
        .then_ignore(just("}}"));

    let boxed = just('[')
        .ignore_then(any().filter(|c: &char| *c != ']').repeated().to_slice())
        .then_ignore(just(']'));

    let rounded = just('(')
        .ignore_then(any().filter(|c: &char| *c != ')').repeated().to_slice())
        .then_ignore(just(')'));

    let node_shape = choice((
        circle.map(|label: &str| (label, NodeShape::Circle)),
        cylinder.map(|label: &str| (label, NodeShape::Cylinder)),
        hexagon.map(|label: &str| (label, NodeShape::Hexagon)),
        boxed.map(|label: &str| (label, NodeShape::Box)),
        rounded.map(|label: &str| (label, NodeShape::Rounded)),
    ));

    let node = ident.then(node_shape.or_not()).map(
        |(id, shape_opt): (&str, Option<(&str, NodeShape)>)| {
            let id = id.to_string();
            match shape_opt {
                Some((raw_label, shape)) => {
                    let trimmed = raw_label.trim();
                    AstNode {
                        id,
                        label: (!trimmed.is_empty()).then(|| trimmed.to_string()),
                        shape: Some(shape),
                    }
                }
                None => AstNode {
                    id,
                    label: None,
                    shape: None,
                },
            }
        },
    );

    let pipe_label = just('|')
        .ignore_then(any().filter(|c: &char| *c != '|').repeated().to_slice())
        .then_ignore(just('|'))
        .map(|s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

    let link = just("-->")
        .ignore_then(inline_ws)
        .ignore_then(pipe_label.or_not())
        .then_ignore(inline_ws)
        .then(node.clone())
        .map(|(label, to)| (label.flatten(), to));

    node.then(
        inline_ws
            .ignore_then(link)
            .repeated()
            .collect::<Vec<(Option<String>, AstNode)>>(),
    )
    .then_ignore(inline_ws)
    .then_ignore(end())
    .map(|(head, links)| Chain { head, links })
}
