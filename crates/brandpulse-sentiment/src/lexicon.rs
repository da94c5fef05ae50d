//! Word valences for retail/social-media caption sentiment.

/// Word weights, AFINN-style.
///
/// Keys are lowercase single words. Valences range over `-5..=5`; positive
/// values are favorable, negative unfavorable. The comparative score is the
/// summed valence divided by the token count, so longer captions need
/// proportionally stronger language to leave the neutral band.
pub(crate) const LEXICON: &[(&str, i32)] = &[
    // Positive signals
    ("amazing", 4),
    ("awesome", 4),
    ("beautiful", 3),
    ("best", 3),
    ("bold", 2),
    ("chic", 3),
    ("classic", 2),
    ("comfortable", 2),
    ("cozy", 2),
    ("cute", 2),
    ("delighted", 3),
    ("dreamy", 3),
    ("effortless", 2),
    ("elegant", 3),
    ("elevate", 2),
    ("elevated", 2),
    ("exciting", 3),
    ("excited", 3),
    ("exclusive", 2),
    ("fabulous", 4),
    ("fave", 3),
    ("favorite", 3),
    ("favourites", 3),
    ("flawless", 4),
    ("fresh", 2),
    ("fun", 3),
    ("glam", 2),
    ("glow", 2),
    ("gorgeous", 4),
    ("great", 3),
    ("good", 2),
    ("happy", 3),
    ("iconic", 3),
    ("inspired", 2),
    ("love", 3),
    ("loved", 3),
    ("loving", 3),
    ("luxe", 2),
    ("luxury", 2),
    ("must", 1),
    ("new", 1),
    ("obsessed", 3),
    ("perfect", 4),
    ("polished", 2),
    ("pretty", 2),
    ("radiant", 3),
    ("recommend", 3),
    ("sale", 2),
    ("save", 2),
    ("slay", 3),
    ("soft", 1),
    ("special", 2),
    ("standout", 2),
    ("stunning", 4),
    ("stylish", 3),
    ("sweet", 2),
    ("timeless", 2),
    ("top", 2),
    ("treat", 2),
    ("trending", 2),
    ("vibrant", 2),
    ("want", 1),
    ("win", 3),
    ("winner", 3),
    ("wow", 3),
    ("yes", 1),
    // Negative signals
    ("awful", -4),
    ("bad", -3),
    ("boring", -2),
    ("broke", -2),
    ("broken", -3),
    ("cancel", -2),
    ("cancelled", -2),
    ("cheap", -2),
    ("complaint", -3),
    ("delay", -2),
    ("delayed", -2),
    ("disappointed", -3),
    ("disappointing", -3),
    ("dislike", -2),
    ("expensive", -1),
    ("fail", -3),
    ("failed", -3),
    ("fake", -3),
    ("flaw", -2),
    ("hate", -4),
    ("horrible", -4),
    ("lost", -2),
    ("meh", -1),
    ("miss", -1),
    ("missed", -1),
    ("missing", -2),
    ("nasty", -3),
    ("never", -1),
    ("no", -1),
    ("nope", -1),
    ("overpriced", -3),
    ("poor", -2),
    ("problem", -2),
    ("refund", -2),
    ("regret", -3),
    ("return", -1),
    ("returned", -1),
    ("rude", -3),
    ("sad", -2),
    ("scam", -4),
    ("terrible", -4),
    ("ugly", -3),
    ("unhappy", -3),
    ("waste", -3),
    ("worse", -3),
    ("worst", -4),
    ("wrong", -2),
];

/// Look up the valence of a lowercase word.
pub(crate) fn valence(word: &str) -> Option<i32> {
    LEXICON
        .iter()
        .find(|(lex_word, _)| *lex_word == word)
        .map(|&(_, weight)| weight)
}
