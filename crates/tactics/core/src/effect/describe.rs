//! Human-readable effect descriptions.

use core::fmt;

use super::{Effect, EffectKind};

fn signed(value: i32) -> String {
    format!("{}{}", if value > 0 { "+" } else { "-" }, value.unsigned_abs())
}

fn name(raw: &str) -> String {
    raw.replace('_', " ")
}

fn value_parts(on: i32, off: i32, start: i32, end: i32) -> Vec<String> {
    let mut parts = Vec::new();

    if on != 0 {
        if off == -on {
            parts.push(format!("{} while active", signed(on)));
        } else if off != 0 {
            parts.push(format!("{} on", signed(on)));
            parts.push(format!("{} off", signed(off)));
        } else {
            parts.push(signed(on));
        }
    }

    if start != 0 {
        if end == -start {
            parts.push(format!("{} during turn", signed(start)));
        } else {
            parts.push(format!("{} on turn start", signed(start)));
            if end != 0 {
                parts.push(format!("{} on turn end", signed(end)));
            }
        }
    } else if end != 0 {
        parts.push(format!("{} on turn end", signed(end)));
    }

    if off != 0 && on == 0 {
        parts.push(format!("{} when removed", signed(off)));
    }
    parts
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage { base, span } if *span > 0 => {
                write!(f, "do {base}-{} damage", base + span)
            }
            Self::Damage { base, .. } => write!(f, "do {base} damage"),
            Self::Attribute { attribute, value } => {
                write!(f, "{} {}", name(attribute.as_ref()), signed(*value))
            }
            Self::AttributeMultiply { attribute, value } => {
                write!(f, "{} {}%", name(attribute.as_ref()), signed(*value))
            }
            Self::AttributeLimit { attribute, value } => {
                write!(f, "limit {} to {value}", name(attribute.as_ref()))
            }
            Self::Value {
                value,
                on,
                off,
                start,
                end,
            } => {
                let parts = value_parts(*on, *off, *start, *end);
                if parts.is_empty() {
                    f.write_str("no effect")
                } else {
                    write!(f, "{} {}", name(value.as_ref()), parts.join(", "))
                }
            }
            Self::ValueTransfer { value, amount } => {
                let verb = if *amount < 0 { "steal" } else { "give" };
                write!(f, "{verb} {} {}", amount.unsigned_abs(), name(value.as_ref()))
            }
            Self::Cooldown { cooling, maxcount } => {
                let cooling = if *cooling == 0 {
                    "Full".to_owned()
                } else {
                    cooling.to_string()
                };
                match maxcount {
                    0 => write!(f, "{cooling} cooling (all equipments)"),
                    1 => write!(f, "{cooling} cooling (1 equipment)"),
                    count => write!(f, "{cooling} cooling ({count} equipments)"),
                }
            }
            Self::Repel { distance } => write!(f, "repel ships {distance}km away"),
            Self::Pinned { hard: true } => f.write_str("anchored"),
            Self::Pinned { hard: false } => f.write_str("pinned"),
            Self::DamageModifier { percent } => {
                write!(f, "{}% damage taken", signed(*percent))
            }
            Self::Watch { .. } => f.write_str("watched"),
            Self::Sticky { base, duration, .. } => {
                let plural = if *duration > 1 { "s" } else { "" };
                write!(f, "{} for {duration} turn{plural}", base.kind)
            }
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}
