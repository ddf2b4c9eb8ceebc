//! Module `commands`
//!
//! Parses request lines into the `Request` enum.

use crate::error::ProtocolError;

/// A request parsed from one client line.
///
/// Each variant corresponds to one proxy operation. Path arguments are kept
/// as received; the mediation layer decides whether they are acceptable.
#[derive(Debug, PartialEq)]
pub enum Request {
    PathExists(String),
    PathValid(String),
    Mkdir(String),
    Rmdir { path: String, force: bool },
    LinkPath { target: String, link: String },
    IsMountPoint(String),
    Quit,
}

impl Request {
    /// Verb used on the wire
    pub fn verb(&self) -> &'static str {
        match self {
            Request::PathExists(_) => "PATHEXISTS",
            Request::PathValid(_) => "PATHVALID",
            Request::Mkdir(_) => "MKDIR",
            Request::Rmdir { .. } => "RMDIR",
            Request::LinkPath { .. } => "LINKPATH",
            Request::IsMountPoint(_) => "ISMOUNTPOINT",
            Request::Quit => "QUIT",
        }
    }
}

/// Splits a line into arguments. Double quotes group an argument that
/// contains whitespace; there are no escapes, so backslashes in Windows
/// paths pass through untouched.
fn split_arguments(raw: &str) -> Result<Vec<String>, ProtocolError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in raw.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ProtocolError::UnterminatedQuote);
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

fn parse_flag(value: &str) -> Result<bool, ProtocolError> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ProtocolError::InvalidFlag(value.to_string())),
    }
}

/// Parses a raw request line received from a client.
pub fn parse_request(raw: &str) -> Result<Request, ProtocolError> {
    let mut args = split_arguments(raw.trim())?.into_iter();
    let verb = args.next().unwrap_or_default().to_ascii_uppercase();
    let rest: Vec<String> = args.collect();

    let request = match verb.as_str() {
        "QUIT" => {
            if !rest.is_empty() {
                return Err(ProtocolError::TooManyArguments(verb.clone()));
            }
            return Ok(Request::Quit);
        }
        "PATHEXISTS" | "PATHVALID" | "MKDIR" | "ISMOUNTPOINT" => {
            let [path] = exact::<1>(&verb, rest, ["path"])?;
            match verb.as_str() {
                "PATHEXISTS" => Request::PathExists(path),
                "PATHVALID" => Request::PathValid(path),
                "MKDIR" => Request::Mkdir(path),
                _ => Request::IsMountPoint(path),
            }
        }
        "RMDIR" => match rest.len() {
            0 => return Err(ProtocolError::MissingArgument("path")),
            1 | 2 => {
                let mut rest = rest.into_iter();
                let path = rest.next().unwrap_or_default();
                let force = match rest.next() {
                    Some(flag) => parse_flag(&flag)?,
                    None => false,
                };
                Request::Rmdir { path, force }
            }
            _ => return Err(ProtocolError::TooManyArguments(verb.clone())),
        },
        "LINKPATH" => {
            let [target, link] = exact::<2>(&verb, rest, ["target", "link"])?;
            Request::LinkPath { target, link }
        }
        _ => return Err(ProtocolError::UnknownCommand(verb.clone())),
    };
    Ok(request)
}

fn exact<const N: usize>(
    verb: &str,
    args: Vec<String>,
    names: [&'static str; N],
) -> Result<[String; N], ProtocolError> {
    if args.len() < N {
        return Err(ProtocolError::MissingArgument(names[args.len()]));
    }
    args.try_into()
        .map_err(|_| ProtocolError::TooManyArguments(verb.to_string()))
}
