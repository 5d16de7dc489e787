// Copyright (C) 2023 Dheatly23
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Transform selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Xor,
    Arithmetic,
    BitShift,
    AdjacentSwap,
    RandomSwap,
    BlockSwap,
    ChannelShift,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Xor,
        Method::Arithmetic,
        Method::BitShift,
        Method::AdjacentSwap,
        Method::RandomSwap,
        Method::BlockSwap,
        Method::ChannelShift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Xor => "xor",
            Method::Arithmetic => "arithmetic",
            Method::BitShift => "bit_shift",
            Method::AdjacentSwap => "adjacent_swap",
            Method::RandomSwap => "random_swap",
            Method::BlockSwap => "block_swap",
            Method::ChannelShift => "channel_shift",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnsupportedMethod(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    /// Operation that undoes `self` for the same operand.
    pub fn inverse(self) -> Self {
        match self {
            ArithmeticOp::Add => ArithmeticOp::Subtract,
            ArithmeticOp::Subtract => ArithmeticOp::Add,
            ArithmeticOp::Multiply => ArithmeticOp::Divide,
            ArithmeticOp::Divide => ArithmeticOp::Multiply,
        }
    }
}

impl FromStr for ArithmeticOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "add" => ArithmeticOp::Add,
            "subtract" => ArithmeticOp::Subtract,
            "multiply" => ArithmeticOp::Multiply,
            "divide" => ArithmeticOp::Divide,
            _ => return Err(Error::invalid("operation", format!("unknown operation `{s}`"))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(Error::invalid("direction", format!("unknown direction `{s}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

/// Validated transform descriptor.
///
/// Build it with the constructors or [Transform::from_params]; both reject
/// parameters outside their domain. [crate::apply] validates again before
/// touching the buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Xor {
        key: u8,
    },
    Arithmetic {
        op: ArithmeticOp,
        value: u8,
    },
    /// Circular bit rotation.
    BitShift {
        amount: u32,
        direction: Direction,
    },
    AdjacentSwap,
    RandomSwap {
        percentage: f64,
        seed: u64,
    },
    BlockSwap {
        block_size: usize,
        seed: u64,
    },
    ChannelShift {
        shift: u8,
    },
}

fn byte_param(name: &'static str, v: i64) -> Result<u8> {
    u8::try_from(v).map_err(|_| Error::invalid(name, format!("{v} is outside 0..=255")))
}

impl Transform {
    pub fn xor(key: i64) -> Result<Self> {
        Ok(Transform::Xor {
            key: byte_param("key", key)?,
        })
    }

    pub fn arithmetic(op: ArithmeticOp, value: i64) -> Result<Self> {
        let t = Transform::Arithmetic {
            op,
            value: byte_param("value", value)?,
        };
        t.validate()?;
        Ok(t)
    }

    pub fn bit_shift(amount: i64, direction: Direction) -> Result<Self> {
        let t = Transform::BitShift {
            amount: u32::try_from(amount)
                .map_err(|_| Error::invalid("shift_amount", format!("{amount} is negative")))?,
            direction,
        };
        t.validate()?;
        Ok(t)
    }

    pub fn adjacent_swap() -> Self {
        Transform::AdjacentSwap
    }

    pub fn random_swap(percentage: f64, seed: u64) -> Result<Self> {
        let t = Transform::RandomSwap { percentage, seed };
        t.validate()?;
        Ok(t)
    }

    pub fn block_swap(block_size: i64, seed: u64) -> Result<Self> {
        let t = Transform::BlockSwap {
            block_size: usize::try_from(block_size).map_err(|_| {
                Error::invalid("block_size", format!("{block_size} is not positive"))
            })?,
            seed,
        };
        t.validate()?;
        Ok(t)
    }

    pub fn channel_shift(shift: i64) -> Result<Self> {
        let t = Transform::ChannelShift {
            shift: byte_param("shift", shift)?,
        };
        t.validate()?;
        Ok(t)
    }

    /// Builds a descriptor for `method`, taking only the parameters it uses.
    pub fn from_params(method: Method, params: &Params) -> Result<Self> {
        match method {
            Method::Xor => Self::xor(params.key),
            Method::Arithmetic => Self::arithmetic(params.operation, params.value),
            Method::BitShift => Self::bit_shift(params.shift_amount, params.direction),
            Method::AdjacentSwap => Ok(Self::adjacent_swap()),
            Method::RandomSwap => Self::random_swap(params.swap_percentage, params.seed),
            Method::BlockSwap => Self::block_swap(params.block_size, params.seed),
            Method::ChannelShift => Self::channel_shift(params.channel_shift),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Transform::Xor { .. } => Method::Xor,
            Transform::Arithmetic { .. } => Method::Arithmetic,
            Transform::BitShift { .. } => Method::BitShift,
            Transform::AdjacentSwap => Method::AdjacentSwap,
            Transform::RandomSwap { .. } => Method::RandomSwap,
            Transform::BlockSwap { .. } => Method::BlockSwap,
            Transform::ChannelShift { .. } => Method::ChannelShift,
        }
    }

    /// Checks every parameter against its domain.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Transform::Xor { .. } | Transform::AdjacentSwap => Ok(()),
            Transform::Arithmetic { op, value } => match op {
                ArithmeticOp::Add | ArithmeticOp::Subtract => Ok(()),
                ArithmeticOp::Divide if value == 0 => {
                    Err(Error::invalid("value", "division by zero"))
                }
                ArithmeticOp::Multiply | ArithmeticOp::Divide if value % 2 == 0 => {
                    Err(Error::invalid(
                        "value",
                        format!("{value} is even and has no inverse modulo 256"),
                    ))
                }
                ArithmeticOp::Multiply | ArithmeticOp::Divide => Ok(()),
            },
            Transform::BitShift { amount, .. } if amount > 7 => Err(Error::invalid(
                "shift_amount",
                format!("{amount} is outside 0..=7"),
            )),
            Transform::BitShift { .. } => Ok(()),
            Transform::RandomSwap { percentage, .. } => {
                if (0.0..=1.0).contains(&percentage) {
                    Ok(())
                } else {
                    Err(Error::invalid(
                        "swap_percentage",
                        format!("{percentage} is outside 0.0..=1.0"),
                    ))
                }
            }
            Transform::BlockSwap { block_size: 0, .. } => {
                Err(Error::invalid("block_size", "0 is not positive"))
            }
            Transform::BlockSwap { .. } => Ok(()),
            Transform::ChannelShift { shift } if shift > 2 => Err(Error::invalid(
                "shift",
                format!("{shift} is outside 0..=2"),
            )),
            Transform::ChannelShift { .. } => Ok(()),
        }
    }
}

/// Loose parameter set covering every method.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub key: i64,
    pub operation: ArithmeticOp,
    pub value: i64,
    pub shift_amount: i64,
    pub direction: Direction,
    pub swap_percentage: f64,
    pub block_size: i64,
    pub seed: u64,
    pub channel_shift: i64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            key: 123,
            operation: ArithmeticOp::Add,
            value: 50,
            shift_amount: 2,
            direction: Direction::Left,
            swap_percentage: 0.5,
            block_size: 2,
            seed: 42,
            channel_shift: 1,
        }
    }
}
