//! Heuristic syllable estimation
//!
//! Counts vowel groups and applies a few suffix corrections. The result is an
//! approximation, but it is stable: historical grades depend on these exact rules,
//! including the single diphthong decrement regardless of how many pairs a word has.

const VOWELS: &[u8] = b"aeiouy";
const DIPHTHONG_VOWELS: &[u8] = b"aeiou";

/// Estimate the number of syllables in a single word. Always returns at least 1.
pub fn estimate(word: &str) -> usize {
    let letters: Vec<u8> = word
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_lowercase())
        .collect();

    if letters.len() <= 3 {
        return 1;
    }

    let mut count = vowel_groups(&letters).max(1) as isize;

    if letters.ends_with(b"e") && !letters.ends_with(b"le") {
        count -= 1;
    }
    if letters.ends_with(b"es") || letters.ends_with(b"ed") {
        count -= 1;
    }
    if has_diphthong(&letters) {
        count -= 1;
    }

    count.max(1) as usize
}

fn vowel_groups(letters: &[u8]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for b in letters {
        let is_vowel = VOWELS.contains(b);
        if is_vowel && !in_group {
            groups += 1;
        }
        in_group = is_vowel;
    }
    groups
}

fn has_diphthong(letters: &[u8]) -> bool {
    letters
        .windows(2)
        .any(|pair| DIPHTHONG_VOWELS.contains(&pair[0]) && DIPHTHONG_VOWELS.contains(&pair[1]))
}
