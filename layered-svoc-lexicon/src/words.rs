//! Static English word lists.
//!
//! These are the seed tables the default [`Lexicon`](crate::Lexicon) is built
//! from. They are deliberately small: the tokenizer falls back to suffix
//! heuristics for anything not listed here.

pub(crate) const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "no", "every", "each", "either", "neither", "another", "such",
    "all", "both", "few", "many", "several", "much", "most",
];

pub(crate) const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "yourselves", "themselves",
    "mine", "yours", "hers", "ours", "theirs", "who", "whom", "whose", "what", "whatever",
    "whoever", "which", "someone", "somebody", "something", "anyone", "anybody", "anything",
    "everyone", "everybody", "everything", "nobody", "nothing", "one",
];

/// Forms of be/have/do, plus their negative contractions.
pub(crate) const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "isn't", "aren't", "wasn't", "weren't", "haven't", "hasn't", "hadn't",
    "don't", "doesn't", "didn't",
];

pub(crate) const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must", "can't",
    "cannot", "couldn't", "won't", "wouldn't", "shouldn't", "mustn't",
];

pub(crate) const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "out",
    "off", "over", "under", "around", "among", "across", "behind", "beyond", "near",
    "without", "within", "toward", "towards", "upon", "despite", "since", "until",
    "along", "throughout",
];

pub(crate) const COORDINATORS: &[&str] = &["and", "but", "or", "nor", "yet", "so"];

pub(crate) const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "unless", "while", "whereas", "whenever", "wherever",
    "provided", "supposing", "once", "as",
];

/// Words that introduce a content clause.
pub(crate) const COMPLEMENTIZERS: &[&str] = &["that", "whether", "if"];

pub(crate) const PARTICLES: &[&str] = &["to", "not", "n't"];

pub(crate) const WH_WORDS: &[&str] = &[
    "what", "who", "whom", "whose", "which", "where", "when", "why", "how",
];

pub(crate) const ADVERBS: &[&str] = &[
    "rarely", "never", "always", "often", "seldom", "only", "also", "already", "just",
    "still", "even", "ever", "very", "too", "quite", "here", "there", "now", "then", "soon",
    "yesterday", "today", "tomorrow", "again", "almost", "hardly", "scarcely", "perhaps",
    "maybe", "well", "more", "less", "sometimes", "usually", "nowhere", "where", "when",
    "why", "how", "merely", "indeed", "however", "therefore", "thus", "away", "back",
];

pub(crate) const ADJECTIVES: &[&str] = &[
    "happy", "sad", "good", "bad", "new", "old", "big", "small", "large", "tired", "angry",
    "beautiful", "aware", "proud", "glad", "sorry", "busy", "free", "true", "wrong",
    "right", "red", "blue", "green", "young", "long", "short", "high", "low", "strong",
    "weak", "rich", "poor", "clean", "dirty", "quiet", "loud", "dark", "bright", "cold",
    "hot", "warm", "full", "empty", "late", "early", "clear", "simple", "open", "fond",
    "full", "kind", "nice", "great", "fine", "safe", "wise", "calm", "quick", "slow",
    "honest", "famous", "obvious", "serious", "guilty", "innocent", "silent", "useful",
];

/// Adjectives that head a subject complement even when a labeler marks them as objects.
pub(crate) const COPULAR_ADJECTIVES: &[&str] = &[
    "bound", "likely", "unlikely", "ready", "able", "unable", "supposed", "willing", "apt",
    "certain", "sure", "afraid", "capable", "inclined", "prone", "destined", "meant", "set",
    "about", "due", "important", "necessary", "possible", "impossible", "difficult", "easy",
    "hard",
];

/// Adverbial particles that may legitimately extend a V element ("gave up").
pub(crate) const PHRASAL_PARTICLES: &[&str] = &[
    "up", "out", "off", "down", "away", "over", "back", "in", "on", "around", "through",
];

/// Words ending in -ing that are not verb forms.
pub(crate) const NON_VERBAL_ING: &[&str] = &[
    "thing", "nothing", "something", "anything", "everything", "morning", "evening",
    "during", "ceiling", "king", "ring", "spring", "string", "wing", "sibling", "pudding",
    "wedding", "bring", "sing", "swing", "sting", "cling", "fling",
];

/// Irregular inflected verb forms mapped to their lemma.
pub(crate) const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"),
    ("being", "be"), ("isn't", "be"), ("aren't", "be"), ("wasn't", "be"), ("weren't", "be"),
    ("has", "have"), ("had", "have"), ("having", "have"), ("hasn't", "have"),
    ("haven't", "have"), ("hadn't", "have"), ("does", "do"), ("did", "do"), ("done", "do"),
    ("doing", "do"), ("don't", "do"), ("doesn't", "do"), ("didn't", "do"),
    ("became", "become"), ("came", "come"), ("went", "go"), ("gone", "go"), ("got", "get"),
    ("gotten", "get"), ("grew", "grow"), ("grown", "grow"), ("ran", "run"), ("fell", "fall"),
    ("fallen", "fall"), ("felt", "feel"), ("kept", "keep"), ("made", "make"),
    ("found", "find"), ("left", "leave"), ("thought", "think"), ("said", "say"),
    ("told", "tell"), ("knew", "know"), ("known", "know"), ("saw", "see"), ("seen", "see"),
    ("gave", "give"), ("given", "give"), ("took", "take"), ("taken", "take"),
    ("wrote", "write"), ("written", "write"), ("spoke", "speak"), ("spoken", "speak"),
    ("showed", "show"), ("shown", "show"), ("sent", "send"), ("built", "build"),
    ("held", "hold"), ("brought", "bring"), ("caught", "catch"), ("taught", "teach"),
    ("bought", "buy"), ("lent", "lend"), ("paid", "pay"), ("threw", "throw"),
    ("thrown", "throw"), ("chose", "choose"), ("chosen", "choose"), ("hid", "hide"),
    ("hidden", "hide"), ("broke", "break"), ("broken", "break"), ("swore", "swear"),
    ("sworn", "swear"), ("stole", "steal"), ("stolen", "steal"), ("wore", "wear"),
    ("worn", "wear"), ("tore", "tear"), ("torn", "tear"), ("born", "bear"),
    ("borne", "bear"), ("drew", "draw"), ("drawn", "draw"), ("began", "begin"),
    ("begun", "begin"), ("sang", "sing"), ("sung", "sing"), ("rang", "ring"),
    ("rung", "ring"), ("drank", "drink"), ("drunk", "drink"), ("swam", "swim"),
    ("swum", "swim"), ("drove", "drive"), ("driven", "drive"), ("led", "lead"),
    ("meant", "mean"), ("met", "meet"), ("heard", "hear"), ("stood", "stand"),
    ("understood", "understand"), ("sold", "sell"), ("sought", "seek"), ("spent", "spend"),
    ("slept", "sleep"), ("struck", "strike"), ("won", "win"), ("lost", "lose"),
    ("ate", "eat"), ("eaten", "eat"), ("flew", "fly"), ("flown", "fly"), ("rose", "rise"),
    ("risen", "rise"), ("rode", "ride"), ("ridden", "ride"), ("sat", "sit"), ("lay", "lie"),
    ("lain", "lie"), ("forgot", "forget"), ("forgotten", "forget"), ("froze", "freeze"),
    ("frozen", "freeze"), ("woke", "wake"), ("woken", "wake"), ("shook", "shake"),
    ("shaken", "shake"), ("forgave", "forgive"), ("forgiven", "forgive"),
    ("forbade", "forbid"), ("forbidden", "forbid"), ("fed", "feed"), ("bound", "bind"),
    ("wound", "wind"), ("overcame", "overcome"),
];

/// Irregular past participles that end in neither -ed nor -en.
pub(crate) const IRREGULAR_PARTICIPLES: &[&str] = &[
    "been", "done", "gone", "seen", "known", "shown", "grown", "drawn", "thrown", "blown",
    "born", "borne", "flown", "sworn", "torn", "worn", "begun", "drunk", "rung", "sung",
    "sunk", "swum", "brought", "bought", "built", "caught", "fed", "felt", "found", "had",
    "heard", "held", "kept", "left", "lent", "lost", "made", "meant", "met", "paid", "said",
    "sent", "set", "shot", "shut", "slept", "sold", "sought", "spent", "stood", "struck",
    "taught", "thought", "told", "understood", "won", "wound", "bound", "cut", "hit",
    "hurt", "let", "put", "quit", "read", "rid", "split", "spread", "come", "become",
    "overcome", "run", "lain", "written", "taken", "given", "spoken", "chosen", "hidden",
    "broken", "stolen", "driven", "eaten", "fallen", "forgotten", "frozen", "woken",
    "shaken", "forgiven", "forbidden", "risen", "ridden", "gotten",
];

/// Verb lemmas the tokenizer recognises as main verbs in addition to every
/// lemma listed in a verb class.
pub(crate) const COMMON_VERBS: &[&str] = &[
    "acknowledge", "inspire", "go", "see", "take", "stand", "lose", "meet", "include",
    "continue", "change", "lead", "follow", "stop", "speak", "add", "spend", "walk", "win",
    "love", "wait", "serve", "die", "reach", "kill", "raise", "sell", "require", "pull",
    "treat", "deliver", "codify", "protect", "exclude", "publish", "sign", "eat", "drink",
    "sleep", "arrive", "finish", "start", "try", "like", "work", "ask", "put", "visit",
    "solve", "inform", "answer", "attend", "close", "carry", "cry", "study", "worry",
    "travel", "enjoy", "hate", "prefer", "chase", "bark", "laugh", "smile", "sing", "dance",
    "swim", "fly", "sit", "lie", "rise", "exist", "occur", "disappear", "vanish", "open",
    "play", "move", "help", "begin", "watch", "hold", "catch", "speak", "break", "choose",
    "steal", "wear", "tear", "bear", "sing", "drink", "ring", "seek", "strike", "ride",
    "freeze", "wake", "shake", "forgive", "forbid", "feed", "bind", "wind", "overcome",
    "cut", "hit", "hurt", "shut", "shoot", "quit", "spread", "split", "accept", "respect",
    "trust", "like", "enter", "leave", "return", "remove", "receive", "reject", "release",
    "review", "approve", "invite", "marry", "kick", "push", "check", "cook", "clean",
    "wash", "paint", "fix", "hide", "lend", "owe", "sleep", "bite", "fight", "define",
    "confess", "guard", "attack", "lecture",
];
