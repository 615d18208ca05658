use birch_morph::segmenter::{boundary_offsets, collapse_spans, normalize_text};
use birch_morph::Segmenter;

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Ну, кое-как – нигде {C смеётся} <break> что-нибудь?".to_string());
    println!("Input: {}", input);

    let text = collapse_spans(&normalize_text(&input));
    println!("Normalized: {}", text);

    let offsets = boundary_offsets(&text);
    println!("\nSlices:");
    for (i, window) in offsets.windows(2).enumerate() {
        println!("  {}: {}..{} {:?}", i, window[0], window[1], &text[window[0]..window[1]]);
    }

    let tokens = Segmenter::new().tokenize(&input);
    println!("\nTokens:");
    for (i, token) in tokens.iter().enumerate() {
        println!("  {}: {:?} ({})", i, token.text, token.kind.as_str());
    }

    let words = tokens.iter().filter(|t| t.is_word() || t.is_clitic()).count();
    let punct = tokens.iter().filter(|t| t.is_punct()).count();
    println!("\nWord tokens count: {}", words);
    println!("Punctuation count: {}", punct);
}
