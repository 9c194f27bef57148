//! Generates random input text that the parser accepts. Used for sample output
//! from the binary and for round-trip tests.

use rand::Rng;

const NAME_LETTERS: &[u8] = b"ABCDEFGHIJKMNOPQRSTUVWXYZ";
const MAX_NAME_LETTERS: usize = 2;
const MAX_NAME_DIGITS: usize = 2;
const MAX_SEQUENCE_LEN: usize = 3;

// Random name of letters followed by digits. `L` is left out of the letters
// because it would start a lambda at the front of a name.
fn generate_name<R: Rng + ?Sized>(rng: &mut R, string_so_far: &mut String) {
    for _ in 0..rng.gen_range(1..=MAX_NAME_LETTERS) {
        let letter = NAME_LETTERS[rng.gen_range(0..NAME_LETTERS.len())] as char;
        string_so_far.push(letter);
    }

    for _ in 0..rng.gen_range(1..=MAX_NAME_DIGITS) {
        string_so_far.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
}

// Random sequence of expressions, as found at the top level or inside a body.
fn generate_sequence<R: Rng + ?Sized>(rng: &mut R, depth: usize, string_so_far: &mut String) {
    for _ in 0..rng.gen_range(1..=MAX_SEQUENCE_LEN) {
        generate_expression(rng, depth, string_so_far);
    }
}

// Random single expression. Once depth runs out only variables are produced.
fn generate_expression<R: Rng + ?Sized>(rng: &mut R, depth: usize, string_so_far: &mut String) {
    let choice = if depth == 0 { 0 } else { rng.gen_range(0..3) };

    match choice {
        0 => {
            generate_name(rng, string_so_far);
        }
        1 => {
            string_so_far.push('(');
            generate_sequence(rng, depth - 1, string_so_far);
            string_so_far.push(')');
        }
        _ => {
            string_so_far.push('L');
            generate_name(rng, string_so_far);
            string_so_far.push_str(".(");
            generate_sequence(rng, depth - 1, string_so_far);
            string_so_far.push(')');
        }
    };
}

/// Generates random accepted input with groups and lambdas nested at most
/// `max_depth` deep. Letters come out in mixed case.
pub fn generate_source<R: Rng + ?Sized>(rng: &mut R, max_depth: usize) -> String {
    let mut out_string = String::new();
    generate_sequence(rng, max_depth, &mut out_string);

    return out_string
        .chars()
        .map(|c| {
            if rng.gen_bool(0.5) {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect();
}
