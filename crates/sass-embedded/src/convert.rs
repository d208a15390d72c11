//! Mapping between the protocol's `Value` messages and the host value
//! model, plus the smaller conversions (spans, syntaxes, log messages)
//! shared by the request machinery.

use crate::error::Error;
use crate::options::Syntax;
use crate::value::{
    CalculationOperation, CalculationOperator, CalculationValue, CompilerFunction,
    KeywordsObserver, ListSeparator, SassArgumentList, SassCalculation, SassColor, SassList,
    SassMap, SassNumber, SassString, Value,
};
use crate::{CompilerMessage, Location, MessageKind, Span};
use indexmap::IndexMap;
use proto_sass::embedded_protocol as proto;
use url::Url;

/// Decode a wire value received in a `FunctionCallRequest`.
///
/// `observer` is threaded through every nesting level so that keyword reads
/// on any compiler-created argument list are reported, however deeply the
/// list sits inside the arguments.
pub(crate) fn value_from_proto(
    value: proto::Value,
    observer: &KeywordsObserver,
) -> Result<Value, Error> {
    use proto::value::Value as P;

    let inner = value
        .value
        .ok_or_else(|| Error::protocol("value is missing its contents"))?;

    Ok(match inner {
        P::String(s) => Value::String(SassString {
            text: s.text,
            quoted: s.quoted,
        }),
        P::Number(n) => Value::Number(number_from_proto(n)),
        P::RgbColor(c) => Value::Color(SassColor::rgb(
            c.red.min(255) as u8,
            c.green.min(255) as u8,
            c.blue.min(255) as u8,
            c.alpha,
        )),
        P::HslColor(c) => Value::Color(SassColor::hsl(c.hue, c.saturation, c.lightness, c.alpha)),
        P::HwbColor(c) => Value::Color(SassColor::hwb(c.hue, c.whiteness, c.blackness, c.alpha)),
        P::List(list) => {
            let separator = separator_from_proto(list.separator)?;
            let contents = list
                .contents
                .into_iter()
                .map(|v| value_from_proto(v, observer))
                .collect::<Result<Vec<_>, _>>()?;
            Value::List(SassList {
                separator,
                brackets: list.has_brackets,
                contents,
            })
        }
        P::Map(map) => {
            let mut out = SassMap::new();
            for entry in map.entries {
                let key = entry
                    .key
                    .ok_or_else(|| Error::protocol("map entry is missing its key"))?;
                let value = entry
                    .value
                    .ok_or_else(|| Error::protocol("map entry is missing its value"))?;
                let key = value_from_proto(key, observer)?;
                let value = value_from_proto(value, observer)?;
                if !out.insert(key, value) {
                    return Err(Error::protocol("compiler sent a map with duplicate keys"));
                }
            }
            Value::Map(out)
        }
        P::Singleton(raw) => match proto::value::Singleton::try_from(raw) {
            Ok(proto::value::Singleton::True) => Value::TRUE,
            Ok(proto::value::Singleton::False) => Value::FALSE,
            Ok(proto::value::Singleton::Null) => Value::NULL,
            Err(_) => return Err(Error::protocol(format!("unknown singleton value {raw}"))),
        },
        P::CompilerFunction(f) => Value::CompilerFunction(CompilerFunction { id: f.id }),
        P::HostFunction(_) => {
            return Err(Error::protocol(
                "compiler may not send host functions as argument values",
            ));
        }
        P::ArgumentList(list) => {
            let separator = separator_from_proto(list.separator)?;
            let contents = list
                .contents
                .into_iter()
                .map(|v| value_from_proto(v, observer))
                .collect::<Result<Vec<_>, _>>()?;
            let keywords = list
                .keywords
                .into_iter()
                .map(|(name, v)| Ok((name, value_from_proto(v, observer)?)))
                .collect::<Result<IndexMap<_, _>, Error>>()?;
            Value::ArgumentList(SassArgumentList::from_wire(
                list.id,
                separator,
                contents,
                keywords,
                observer.clone(),
            ))
        }
        P::Calculation(c) => Value::Calculation(calculation_from_proto(c)?),
    })
}

/// Encode a host value for a `FunctionCallResponse`.
pub(crate) fn value_to_proto(value: &Value) -> proto::Value {
    use proto::value::Value as P;

    let inner = match value {
        Value::String(s) => P::String(proto::value::String {
            text: s.text.clone(),
            quoted: s.quoted,
        }),
        Value::Number(n) => P::Number(number_to_proto(n)),
        // The authored model is the preferred wire format.
        Value::Color(c) => match c.repr {
            crate::value::ColorRepr::Rgb {
                red,
                green,
                blue,
                alpha,
            } => P::RgbColor(proto::value::RgbColor {
                red: red as u32,
                green: green as u32,
                blue: blue as u32,
                alpha,
            }),
            crate::value::ColorRepr::Hsl {
                hue,
                saturation,
                lightness,
                alpha,
            } => P::HslColor(proto::value::HslColor {
                hue,
                saturation,
                lightness,
                alpha,
            }),
            crate::value::ColorRepr::Hwb {
                hue,
                whiteness,
                blackness,
                alpha,
            } => P::HwbColor(proto::value::HwbColor {
                hue,
                whiteness,
                blackness,
                alpha,
            }),
        },
        Value::List(l) => P::List(proto::value::List {
            separator: separator_to_proto(l.separator) as i32,
            has_brackets: l.brackets,
            contents: l.contents.iter().map(value_to_proto).collect(),
        }),
        // Host-authored argument lists always cross the wire with id 0;
        // only compiler-assigned IDs participate in access tracking.
        Value::ArgumentList(l) => P::ArgumentList(proto::value::ArgumentList {
            id: 0,
            separator: separator_to_proto(l.separator) as i32,
            contents: l.contents.iter().map(value_to_proto).collect(),
            keywords: l
                .keywords
                .iter()
                .map(|(name, v)| (name.clone(), value_to_proto(v)))
                .collect(),
        }),
        Value::Map(m) => P::Map(proto::value::Map {
            entries: m
                .iter()
                .map(|(key, value)| proto::value::map::Entry {
                    key: Some(value_to_proto(key)),
                    value: Some(value_to_proto(value)),
                })
                .collect(),
        }),
        Value::Calculation(c) => P::Calculation(calculation_to_proto(c)),
        Value::CompilerFunction(f) => {
            P::CompilerFunction(proto::value::CompilerFunction { id: f.id })
        }
        Value::HostFunction(f) => P::HostFunction(proto::value::HostFunction {
            id: f.id(),
            signature: f.signature().to_string(),
        }),
        Value::Bool(true) => P::Singleton(proto::value::Singleton::True as i32),
        Value::Bool(false) => P::Singleton(proto::value::Singleton::False as i32),
        Value::Null => P::Singleton(proto::value::Singleton::Null as i32),
    };
    proto::Value { value: Some(inner) }
}

fn number_from_proto(n: proto::value::Number) -> SassNumber {
    SassNumber {
        value: n.value,
        numerator_units: n.numerators,
        denominator_units: n.denominators,
    }
}

fn number_to_proto(n: &SassNumber) -> proto::value::Number {
    proto::value::Number {
        value: n.value,
        numerators: n.numerator_units.clone(),
        denominators: n.denominator_units.clone(),
    }
}

fn separator_from_proto(raw: i32) -> Result<ListSeparator, Error> {
    match proto::ListSeparator::try_from(raw) {
        Ok(proto::ListSeparator::Comma) => Ok(ListSeparator::Comma),
        Ok(proto::ListSeparator::Space) => Ok(ListSeparator::Space),
        Ok(proto::ListSeparator::Slash) => Ok(ListSeparator::Slash),
        Ok(proto::ListSeparator::Undecided) => Ok(ListSeparator::Undecided),
        Err(_) => Err(Error::protocol(format!("unknown list separator {raw}"))),
    }
}

fn separator_to_proto(separator: ListSeparator) -> proto::ListSeparator {
    match separator {
        ListSeparator::Comma => proto::ListSeparator::Comma,
        ListSeparator::Space => proto::ListSeparator::Space,
        ListSeparator::Slash => proto::ListSeparator::Slash,
        ListSeparator::Undecided => proto::ListSeparator::Undecided,
    }
}

fn calculation_from_proto(c: proto::value::Calculation) -> Result<SassCalculation, Error> {
    match c.name.as_str() {
        "calc" | "min" | "max" | "clamp" => {}
        other => {
            return Err(Error::protocol(format!(
                "unknown calculation kind '{other}'"
            )));
        }
    }
    let arguments = c
        .arguments
        .into_iter()
        .map(calculation_value_from_proto)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SassCalculation {
        name: c.name,
        arguments,
    })
}

fn calculation_value_from_proto(
    v: proto::value::calculation::CalculationValue,
) -> Result<CalculationValue, Error> {
    use proto::value::calculation::calculation_value::Value as P;

    Ok(
        match v
            .value
            .ok_or_else(|| Error::protocol("calculation value is missing its contents"))?
        {
            P::Number(n) => CalculationValue::Number(number_from_proto(n)),
            P::String(s) => CalculationValue::String(s),
            P::Interpolation(s) => CalculationValue::Interpolation(s),
            P::Operation(op) => {
                let operator = match proto::CalculationOperator::try_from(op.operator) {
                    Ok(proto::CalculationOperator::Plus) => CalculationOperator::Plus,
                    Ok(proto::CalculationOperator::Minus) => CalculationOperator::Minus,
                    Ok(proto::CalculationOperator::Times) => CalculationOperator::Times,
                    Ok(proto::CalculationOperator::Divide) => CalculationOperator::Divide,
                    Err(_) => {
                        return Err(Error::protocol(format!(
                            "unknown calculation operator {}",
                            op.operator
                        )));
                    }
                };
                let left = op
                    .left
                    .ok_or_else(|| Error::protocol("calculation operation is missing its left operand"))?;
                let right = op
                    .right
                    .ok_or_else(|| Error::protocol("calculation operation is missing its right operand"))?;
                CalculationValue::Operation(Box::new(CalculationOperation {
                    operator,
                    left: calculation_value_from_proto(*left)?,
                    right: calculation_value_from_proto(*right)?,
                }))
            }
            P::Calculation(c) => CalculationValue::Calculation(calculation_from_proto(c)?),
        },
    )
}

fn calculation_to_proto(c: &SassCalculation) -> proto::value::Calculation {
    proto::value::Calculation {
        name: c.name.clone(),
        arguments: c.arguments.iter().map(calculation_value_to_proto).collect(),
    }
}

fn calculation_value_to_proto(
    v: &CalculationValue,
) -> proto::value::calculation::CalculationValue {
    use proto::value::calculation::calculation_value::Value as P;

    let value = match v {
        CalculationValue::Number(n) => P::Number(number_to_proto(n)),
        CalculationValue::String(s) => P::String(s.clone()),
        CalculationValue::Interpolation(s) => P::Interpolation(s.clone()),
        CalculationValue::Operation(op) => {
            P::Operation(Box::new(proto::value::calculation::CalculationOperation {
                operator: match op.operator {
                    CalculationOperator::Plus => proto::CalculationOperator::Plus,
                    CalculationOperator::Minus => proto::CalculationOperator::Minus,
                    CalculationOperator::Times => proto::CalculationOperator::Times,
                    CalculationOperator::Divide => proto::CalculationOperator::Divide,
                } as i32,
                left: Some(Box::new(calculation_value_to_proto(&op.left))),
                right: Some(Box::new(calculation_value_to_proto(&op.right))),
            }))
        }
        CalculationValue::Calculation(c) => P::Calculation(calculation_to_proto(c)),
    };
    proto::value::calculation::CalculationValue { value: Some(value) }
}

pub(crate) fn syntax_to_proto(syntax: Syntax) -> proto::Syntax {
    match syntax {
        Syntax::Scss => proto::Syntax::Scss,
        Syntax::Indented => proto::Syntax::Indented,
        Syntax::Css => proto::Syntax::Css,
    }
}

pub(crate) fn span_from_proto(span: proto::SourceSpan) -> Span {
    Span {
        text: span.text,
        start: span.start.map(location_from_proto).unwrap_or_default(),
        end: span.end.map(location_from_proto),
        url: none_if_empty(span.url).and_then(|u| Url::parse(&u).ok()),
        context: none_if_empty(span.context),
    }
}

fn location_from_proto(location: proto::source_span::SourceLocation) -> Location {
    Location {
        offset: location.offset,
        line: location.line,
        column: location.column,
    }
}

/// Build a diagnostic from a `LogEvent`. An unrecognized event type means
/// the compiler is speaking a newer protocol than we do.
pub(crate) fn message_from_log(event: proto::outbound_message::LogEvent) -> Result<CompilerMessage, Error> {
    let kind = match proto::LogEventType::try_from(event.r#type) {
        Ok(proto::LogEventType::Warning) => MessageKind::Warning,
        Ok(proto::LogEventType::DeprecationWarning) => MessageKind::Deprecation,
        Ok(proto::LogEventType::Debug) => MessageKind::Debug,
        Err(_) => {
            return Err(Error::protocol(format!(
                "unknown log event type {}",
                event.r#type
            )));
        }
    };
    Ok(CompilerMessage {
        kind,
        message: event.message,
        span: event.span.map(span_from_proto),
        stack_trace: none_if_empty(event.stack_trace),
        deprecation_type: event.deprecation_type,
        formatted: event.formatted,
    })
}

pub(crate) fn none_if_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod test {
    use super::*;
    use proto_sass::embedded_protocol as proto;

    fn decode(value: proto::Value) -> Result<Value, Error> {
        value_from_proto(value, &KeywordsObserver::default())
    }

    fn proto_string(text: &str) -> proto::Value {
        proto::Value {
            value: Some(proto::value::Value::String(proto::value::String {
                text: text.to_string(),
                quoted: true,
            })),
        }
    }

    #[test]
    fn round_trips_a_nested_list() {
        let value = Value::List(SassList {
            separator: ListSeparator::Slash,
            brackets: true,
            contents: vec![
                Value::number(1.5),
                Value::string("two"),
                Value::Color(SassColor::hwb(90.0, 20.0, 40.0, 0.5)),
                Value::TRUE,
                Value::NULL,
            ],
        });

        assert_eq!(decode(value_to_proto(&value)).unwrap(), value);
    }

    #[test]
    fn color_wire_tag_follows_preferred_format() {
        let hsl = Value::Color(SassColor::hsl(30.0, 50.0, 50.0, 1.0));
        match value_to_proto(&hsl).value {
            Some(proto::value::Value::HslColor(_)) => {}
            other => panic!("expected hsl wire format, got {other:?}"),
        }
    }

    #[test]
    fn missing_value_is_a_protocol_error() {
        match decode(proto::Value { value: None }) {
            Err(Error::Protocol(message)) => assert!(message.contains("missing")),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_separator_is_a_protocol_error() {
        let list = proto::Value {
            value: Some(proto::value::Value::List(proto::value::List {
                separator: 99,
                has_brackets: false,
                contents: vec![],
            })),
        };
        assert!(matches!(decode(list), Err(Error::Protocol(_))));
    }

    #[test]
    fn duplicate_map_keys_are_a_protocol_error() {
        let map = proto::Value {
            value: Some(proto::value::Value::Map(proto::value::Map {
                entries: vec![
                    proto::value::map::Entry {
                        key: Some(proto_string("k")),
                        value: Some(proto_string("a")),
                    },
                    proto::value::map::Entry {
                        key: Some(proto_string("k")),
                        value: Some(proto_string("b")),
                    },
                ],
            })),
        };
        match decode(map) {
            Err(Error::Protocol(message)) => assert!(message.contains("duplicate")),
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn inbound_host_function_is_a_protocol_error() {
        let value = proto::Value {
            value: Some(proto::value::Value::HostFunction(
                proto::value::HostFunction {
                    id: 4001,
                    signature: "f()".to_string(),
                },
            )),
        };
        assert!(matches!(decode(value), Err(Error::Protocol(_))));
    }

    #[test]
    fn unknown_calculation_kind_is_a_protocol_error() {
        let value = proto::Value {
            value: Some(proto::value::Value::Calculation(
                proto::value::Calculation {
                    name: "hypot".to_string(),
                    arguments: vec![],
                },
            )),
        };
        assert!(matches!(decode(value), Err(Error::Protocol(_))));
    }

    #[test]
    fn argument_list_encodes_as_host_authored() {
        let list = Value::ArgumentList(SassArgumentList::new(
            vec![Value::number(1.0)],
            IndexMap::new(),
            ListSeparator::Comma,
        ));
        match value_to_proto(&list).value {
            Some(proto::value::Value::ArgumentList(encoded)) => assert_eq!(encoded.id, 0),
            other => panic!("expected argument list, got {other:?}"),
        }
    }

    #[test]
    fn calculation_operations_round_trip() {
        let value = Value::Calculation(SassCalculation {
            name: "calc".to_string(),
            arguments: vec![CalculationValue::Operation(Box::new(
                CalculationOperation {
                    operator: CalculationOperator::Plus,
                    left: CalculationValue::Number(SassNumber {
                        value: 1.0,
                        numerator_units: vec!["px".to_string()],
                        denominator_units: vec![],
                    }),
                    right: CalculationValue::String("$x".to_string()),
                },
            ))],
        });

        assert_eq!(decode(value_to_proto(&value)).unwrap(), value);
    }
}
