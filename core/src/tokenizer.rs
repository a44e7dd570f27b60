use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this are noise (initials, OCR fragments) and dropped.
const MIN_TOKEN_LEN: usize = 3;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let english: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves",
        ];
        let indonesian: &[&str] = &[
            "ada","adalah","agar","akan","antara","apa","apakah","atau","bagi","bahwa","banyak","belum",
            "bisa","boleh","dahulu","dalam","dan","dapat","dari","daripada","demi","dengan","di","dia",
            "dua","guna","hal","hanya","harus","hingga","ia","ini","itu","jadi","jika","juga","kami",
            "kapan","karena","ke","kecuali","kembali","kemudian","kenapa","kepada","ketika","kita",
            "lagi","lain","lebih","maka","masih","melalui","mengapa","menjadi","menurut","mereka",
            "namun","oleh","pada","para","pula","pun","saat","sambil","sampai","sangat","saya","sebab",
            "sebagai","sebelum","secara","sedangkan","sehingga","sejak","sekitar","selain","seluruh",
            "sementara","semua","seperti","serta","sesudah","setelah","setiap","sudah","supaya","tanpa",
            "telah","tentang","terhadap","tersebut","tetapi","tidak","untuk","yaitu","yakni","yang",
        ];
        english.iter().chain(indonesian.iter()).copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Normalize text into a bag-of-words token stream: NFKC normalization,
/// lowercase, word extraction, stopword removal (English + Indonesian),
/// short-token filtering, and stemming.
///
/// Documents at index-build time and queries at search time must go through
/// this same function, otherwise query vectors and document vectors live in
/// different term spaces.
pub fn normalize(text: &str) -> Vec<String> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = Vec::new();
    for mat in RE.find_iter(&folded) {
        let token = mat.as_str();
        if token.chars().count() < MIN_TOKEN_LEN || is_stopword(token) {
            continue;
        }
        tokens.push(STEMMER.stem(token).to_string());
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = normalize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }

    #[test]
    fn drops_short_and_numeric_tokens() {
        let t = normalize("AI is 42 ok running");
        assert_eq!(t, vec!["run".to_string()]);
    }
}
