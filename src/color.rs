// Color strings as they appear in palettes and style trees

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{alpha1, char, multispace0},
    combinator::{all_consuming, map_opt},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated},
    IResult,
};
use plotters::style::{RGBAColor, RGBColor};

/// An sRGB color with alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_rgb(self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.a)
    }
}

/// Colors assigned to series without a palette color, in series order
pub const FALLBACK_PALETTE: [Rgba; 9] = [
    Rgba::rgb(0x54, 0x70, 0xc6),
    Rgba::rgb(0x91, 0xcc, 0x75),
    Rgba::rgb(0xfa, 0xc8, 0x58),
    Rgba::rgb(0xee, 0x66, 0x66),
    Rgba::rgb(0x73, 0xc0, 0xde),
    Rgba::rgb(0x3b, 0xa2, 0x72),
    Rgba::rgb(0xfc, 0x84, 0x52),
    Rgba::rgb(0x9a, 0x60, 0xb4),
    Rgba::rgb(0xea, 0x7c, 0xcc),
];

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
/// or a named color. Surrounding whitespace is ignored.
pub fn parse_color(input: &str) -> Option<Rgba> {
    all_consuming(ws(alt((hex_color, rgb_function, named_color))))(input)
        .ok()
        .map(|(_, color)| color)
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn hex_color(input: &str) -> IResult<&str, Rgba> {
    map_opt(
        preceded(char('#'), take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit())),
        decode_hex,
    )(input)
}

fn decode_hex(hex: &str) -> Option<Rgba> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
    match hex.len() {
        3 => Some(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        6 => Some(Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Rgba {
            a: f64::from(channel(6..8)?) / 255.0,
            ..Rgba::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)
        }),
        _ => None,
    }
}

/// `rgb(..)` takes three components, `rgba(..)` four
fn rgb_function(input: &str) -> IResult<&str, Rgba> {
    alt((
        map_opt(function_args("rgba"), |c: Vec<f64>| match c.as_slice() {
            [r, g, b, a] => Some(Rgba {
                a: a.clamp(0.0, 1.0),
                ..Rgba::rgb(component(*r), component(*g), component(*b))
            }),
            _ => None,
        }),
        map_opt(function_args("rgb"), |c: Vec<f64>| match c.as_slice() {
            [r, g, b] => Some(Rgba::rgb(component(*r), component(*g), component(*b))),
            _ => None,
        }),
    ))(input)
}

/// `name ( n, n, .. )` -> the numeric arguments
fn function_args<'a>(name: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<f64>> {
    preceded(
        terminated(tag_no_case(name), multispace0),
        delimited(char('('), separated_list1(char(','), ws(double)), char(')')),
    )
}

fn component(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn named_color(input: &str) -> IResult<&str, Rgba> {
    map_opt(alpha1, lookup_named)(input)
}

fn lookup_named(name: &str) -> Option<Rgba> {
    let color = match name.to_ascii_lowercase().as_str() {
        "white" => Rgba::rgb(255, 255, 255),
        "black" => Rgba::rgb(0, 0, 0),
        "red" => Rgba::rgb(255, 0, 0),
        "green" => Rgba::rgb(0, 128, 0),
        "blue" => Rgba::rgb(0, 0, 255),
        "yellow" => Rgba::rgb(255, 255, 0),
        "cyan" => Rgba::rgb(0, 255, 255),
        "magenta" => Rgba::rgb(255, 0, 255),
        "orange" => Rgba::rgb(255, 165, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        "pink" => Rgba::rgb(255, 192, 203),
        "brown" => Rgba::rgb(139, 69, 19),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba::rgb(211, 211, 211),
        "transparent" => Rgba { a: 0.0, ..Rgba::rgb(0, 0, 0) },
        _ => return None,
    };
    Some(color)
}
