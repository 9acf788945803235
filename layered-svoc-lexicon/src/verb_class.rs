//! Verb classes used by the pattern classifier, the chain resolver and the gap detector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dictionary class a verb lemma can belong to.
///
/// A lemma may belong to several classes at once ("make" is both
/// object-complement and causative-passive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerbClass {
    /// be/become/seem/remain... take a subject complement
    Linking,
    /// come/get/grow/live + to-infinitive form one predicate
    Aspectual,
    /// seem/appear/happen/tend + to-infinitive
    Raising,
    /// "was made to confess", "was forced to leave"
    CausativePassive,
    /// "is meant to", "is supposed to", "is believed to"
    CopularPassive,
    /// "was built to last": the to-infinitive is a purpose adjunct
    PurposeInPassive,
    /// give/send/tell: S-V-Oi-Od
    Ditransitive,
    /// make/keep/find/call/consider: S-V-Od-C
    ObjectComplement,
    Transitive,
    Intransitive,
    /// claim/think/say/believe: allow long-distance extraction
    Bridge,
    /// verbs taking a that-clause as direct object
    ThatComplement,
    /// want/hope/decide + to-infinitive object
    ToInfinitiveObject,
}

impl VerbClass {
    pub const ALL: [VerbClass; 13] = [
        VerbClass::Linking,
        VerbClass::Aspectual,
        VerbClass::Raising,
        VerbClass::CausativePassive,
        VerbClass::CopularPassive,
        VerbClass::PurposeInPassive,
        VerbClass::Ditransitive,
        VerbClass::ObjectComplement,
        VerbClass::Transitive,
        VerbClass::Intransitive,
        VerbClass::Bridge,
        VerbClass::ThatComplement,
        VerbClass::ToInfinitiveObject,
    ];

    /// The kebab-case name used in override files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linking => "linking",
            Self::Aspectual => "aspectual",
            Self::Raising => "raising",
            Self::CausativePassive => "causative-passive",
            Self::CopularPassive => "copular-passive",
            Self::PurposeInPassive => "purpose-in-passive",
            Self::Ditransitive => "ditransitive",
            Self::ObjectComplement => "object-complement",
            Self::Transitive => "transitive",
            Self::Intransitive => "intransitive",
            Self::Bridge => "bridge",
            Self::ThatComplement => "that-complement",
            Self::ToInfinitiveObject => "to-infinitive-object",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase().replace('_', "-");
        Self::ALL.iter().copied().find(|class| class.name() == wanted)
    }

    /// Classes whose verbs take a following to-infinitive as an obligatory `Comp`.
    pub fn takes_verbal_complement(&self) -> bool {
        matches!(
            self,
            Self::Aspectual | Self::Raising | Self::CausativePassive | Self::CopularPassive
        )
    }

    pub(crate) fn seed_lemmas(&self) -> &'static [&'static str] {
        match self {
            Self::Linking => &[
                "be", "become", "remain", "seem", "appear", "look", "feel", "sound", "taste",
                "smell", "stay", "prove", "turn", "grow", "get", "keep", "go", "come", "run",
                "fall",
            ],
            Self::Aspectual => &["come", "get", "grow", "live"],
            Self::Raising => &["seem", "appear", "happen", "prove", "tend", "chance"],
            Self::CausativePassive => &[
                "make", "force", "cause", "allow", "compel", "enable", "permit", "lead",
                "drive", "get", "let", "help",
            ],
            Self::CopularPassive => &[
                "mean", "suppose", "say", "report", "think", "believe", "consider", "know",
                "find", "expect", "allege", "design",
            ],
            Self::PurposeInPassive => &[
                "build", "create", "develop", "construct", "establish", "organize", "plan",
                "arrange", "use", "employ", "utilize", "deploy", "introduce", "implement",
                "install", "prepare", "configure", "train", "equip", "adapt", "modify",
                "program", "engineer", "craft", "tailor", "optimize", "write", "publish",
            ],
            Self::Ditransitive => &[
                "give", "send", "show", "tell", "buy", "offer", "teach", "bring", "lend",
                "pay", "write", "read", "pass", "hand", "throw", "award", "grant", "promise",
                "wish", "owe",
            ],
            Self::ObjectComplement => &[
                "make", "find", "consider", "call", "keep", "leave", "think", "believe",
                "declare", "prove", "elect", "name", "appoint", "render", "drive", "paint",
                "dye", "turn", "get", "want",
            ],
            Self::Transitive => &[
                "have", "do", "make", "take", "see", "know", "want", "use", "find", "give",
                "tell", "write", "read", "build", "create", "buy", "sell", "acknowledge",
                "protect", "exclude", "treat", "deliver", "inspire", "watch", "love",
                "like", "hate", "need", "bring", "hold", "catch", "solve", "visit",
                "answer", "chase", "eat", "drink", "meet", "reject", "accept",
            ],
            Self::Intransitive => &[
                "arrive", "sleep", "laugh", "smile", "cry", "die", "exist", "occur",
                "disappear", "vanish", "rise", "sit", "lie", "bark", "swim", "fly", "dance",
                "travel", "happen", "go", "come",
            ],
            Self::Bridge => &[
                "claim", "think", "say", "believe", "report", "argue", "assume", "feel",
                "suggest", "know", "suppose", "hope", "imagine", "expect", "fear", "declare",
                "assert", "maintain", "state", "predict", "acknowledge", "admit", "announce",
                "confirm", "deny", "discover", "explain", "find", "hear", "learn", "mean",
                "mention", "notice", "realize", "remember", "reveal", "show", "suspect",
                "understand", "warn", "wish",
            ],
            Self::ThatComplement => &[
                "think", "believe", "know", "say", "tell", "hope", "wish", "assume", "suppose",
                "claim", "suggest", "insist", "demand", "recommend", "feel", "realize",
                "understand", "notice", "expect", "fear", "doubt", "imagine", "acknowledge",
                "admit", "agree", "announce", "argue", "complain", "confirm", "decide", "deny",
                "discover", "explain", "forget", "guess", "hear", "imply", "indicate", "learn",
                "mean", "mention", "predict", "promise", "prove", "recall", "recognize",
                "remember", "report", "reveal", "show", "state", "suspect", "warn", "find",
            ],
            Self::ToInfinitiveObject => &[
                "want", "need", "hope", "wish", "expect", "plan", "decide", "choose", "agree",
                "refuse", "offer", "promise", "threaten", "attempt", "fail", "manage", "learn",
                "afford", "tend", "pretend", "claim", "demand", "desire", "intend", "prepare",
                "strive", "swear", "volunteer", "vow", "arrange", "endeavor",
            ],
        }
    }
}

impl fmt::Display for VerbClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of classes a lemma belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VerbClassSet(u16);

impl VerbClassSet {
    pub fn empty() -> Self {
        Self(0)
    }

    fn bit(class: VerbClass) -> u16 {
        1 << (class as u16)
    }

    pub fn insert(&mut self, class: VerbClass) {
        self.0 |= Self::bit(class);
    }

    pub fn contains(&self, class: VerbClass) -> bool {
        self.0 & Self::bit(class) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = VerbClass> + '_ {
        VerbClass::ALL.iter().copied().filter(move |class| self.contains(*class))
    }

    /// True when any contained class takes an obligatory to-infinitive `Comp`.
    pub fn takes_verbal_complement(&self) -> bool {
        self.iter().any(|class| class.takes_verbal_complement())
    }
}
