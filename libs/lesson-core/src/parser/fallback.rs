//! Built-in transliteration dictionary for bare word tokens.

/// A fallback dictionary hit: native script plus transliteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackWord {
    pub base: &'static str,
    pub transliteration: &'static str,
}

const fn word(base: &'static str, transliteration: &'static str) -> FallbackWord {
    FallbackWord {
        base,
        transliteration,
    }
}

static DICTIONARY: &[(&str, FallbackWord)] = &[
    ("ayubowan", word("ආයුබෝවන්", "ayubowan")),
    ("bayi", word("බයි", "bayi")),
    ("da", word("ද?", "da")),
    ("dukthayi", word("දුක්තයි", "dukthayi")),
    ("eya", word("ඇය", "eya")),
    ("gaman", word("ගමන්", "gaman")),
    ("gena", word("ගෙන්", "gena")),
    ("haduwime", word("හඳුවීමේ", "haduwime")),
    ("hondai", word("හොඳයි", "hondai")),
    ("karunakar", word("කරුණාකර", "karunakara")),
    ("kohenda", word("කොහෙන්ද?", "kohenda")),
    ("kohomada", word("කොහොමද", "kohomada")),
    ("mage", word("මගේ", "mage")),
    ("mama", word("මම", "mama")),
    ("mokakda", word("මොකක්ද?", "mokakda")),
    ("nae", word("නෑ", "nae")),
    ("naehae", word("නැහැ", "naehae")),
    ("nama", word("නම", "nama")),
    ("ohu", word("ඔහු", "ohu")),
    ("oya", word("ඔයා", "oya")),
    ("oyaage", word("ඔයාගේ", "oyage")),
    ("oyaata", word("ඔයාට", "oyata")),
    ("owu", word("ඔව්", "owu")),
    ("rata", word("රට", "rata")),
    ("raththiyek", word("රාත්‍රියක්", "rathriyak")),
    ("samavenna", word("සමාවෙන්න", "samavenna")),
    ("sanipen", word("සනීපෙන්", "sanipen")),
    ("santhoshayi", word("සන්තෝෂයි", "santhoshayi")),
    ("sathutak", word("සතුටක්", "sathutak")),
    ("sthuthiyi", word("ස්තුතියි", "sthuthiyi")),
    ("Sri_Lanka", word("ශ්‍රී ලංකාව", "Sri Lanka")),
    ("Australia", word("ඕස්ට්‍රේලියාව", "Australia")),
    ("India", word("ඉන්දියාව", "India")),
    ("suba", word("සුභ", "suba")),
    ("udek", word("උදේක්", "udek")),
    ("vissara", word("වයස", "vissara")),
    ("ganan", word("ගණන්", "ganan")),
    ("dahaya", word("දහය", "dahaya")),
    ("visi", word("විසි", "visi")),
    ("tis", word("තිස්", "tis")),
    ("kathaa", word("කතා", "kathaa")),
    ("Sinhala", word("සිංහල", "Sinhala")),
    ("English", word("ඉංග්‍රීසි", "English")),
    ("Tamil", word("දෙමළ", "Tamil")),
    ("yanna", word("යන්න", "yanna")),
    ("yaluwa", word("යාලුවා", "yaluwa")),
];

/// Exact-key dictionary lookup.
pub fn lookup(token: &str) -> Option<FallbackWord> {
    DICTIONARY
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, word)| *word)
}

/// Underscores read as spaces when a token has no dictionary entry.
pub fn token_label(token: &str) -> String {
    token.replace('_', " ")
}
