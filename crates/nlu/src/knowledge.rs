//! Knowledge base for the keyword classifier
//!
//! Knowledge groups are an immutable, explicitly constructed value: the
//! precedence order is the construction order, and each group carries one
//! consistent reply shape resolved here instead of being shape-sniffed at
//! classification time. Category groups are derived from the catalog so the
//! classifier and the guided flow always agree on what is orderable.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use snackbot_core::Catalog;

use crate::NluError;

/// Precedence tier of a knowledge group
///
/// Tiers are listed in evaluation order; within that order a later group
/// only wins with a strictly greater score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupTier {
    /// Catalog categories; a win here opens the section in the guided flow
    Category,
    /// Mood/preference groups (spicy, budget, hungry)
    Mood,
    /// FAQ groups (hours, location, delivery, payment)
    Faq,
    /// General greeting; only a candidate above 0.1
    Greeting,
    /// Morning/night scripted greetings
    TimeGreeting,
    /// Scripted exact-phrase matches, forced confidence 0.95
    HumanFlow,
    /// Witty-comeback exact-word matches, forced confidence 0.96
    Personality,
    /// Domain Q&A groups
    DomainQa,
    /// Emotional-tone triggers
    Emotional,
    /// Event triggers; require score above 0.3 to count at all
    Event,
}

impl GroupTier {
    /// Confidence forced on a hit, for the exact-match tiers
    pub fn forced_confidence(&self) -> Option<f32> {
        match self {
            GroupTier::HumanFlow => Some(0.95),
            GroupTier::Personality => Some(0.96),
            _ => None,
        }
    }

    /// Minimum score for this tier to be a candidate at all
    pub fn candidate_floor(&self) -> f32 {
        match self {
            GroupTier::Event => 0.3,
            GroupTier::Greeting => 0.1,
            _ => 0.0,
        }
    }
}

/// Reply payload of a knowledge group, one shape per group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyPayload {
    /// One fixed reply in two scripts; Arabic is used only when the raw
    /// input carries Arabic characters
    Bilingual { latin: String, arabic: String },
    /// Randomly selected variants
    Variants(Vec<String>),
    /// The composer supplies the reply (catalog categories)
    None,
}

/// A named keyword set plus its canned reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGroup {
    pub name: String,
    pub tier: GroupTier,
    /// Trigger keywords; whole phrases for the exact-phrase tier
    pub keywords: Vec<String>,
    pub reply: ReplyPayload,
    /// Whether laughter tokens ("hhh", "lol") fuzz-match this group
    #[serde(default)]
    pub laughter: bool,
}

impl KnowledgeGroup {
    fn new(
        name: &str,
        tier: GroupTier,
        keywords: &[&str],
        reply: ReplyPayload,
    ) -> Self {
        Self {
            name: name.to_string(),
            tier,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reply,
            laughter: false,
        }
    }

    fn with_laughter(mut self) -> Self {
        self.laughter = true;
        self
    }
}

fn bilingual(latin: &str, arabic: &str) -> ReplyPayload {
    ReplyPayload::Bilingual {
        latin: latin.to_string(),
        arabic: arabic.to_string(),
    }
}

fn variants(list: &[&str]) -> ReplyPayload {
    ReplyPayload::Variants(list.iter().map(|s| s.to_string()).collect())
}

/// Extra trigger keywords for known category ids, beyond id and title
static CATEGORY_ALIASES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("pizza", &["بيتزا", "pizzas"]);
    map.insert("tacos", &["طاكوس", "taco"]);
    map.insert("kabab", &["كباب", "kebab", "brochette"]);
    map.insert("plats", &["طبق", "plat", "assiette"]);
    map.insert("sandwich", &["سندويتش", "sandwichs", "panini"]);
    map.insert("drinks", &["مشروبات", "boisson", "drink", "atay"]);
    map.insert("promo", &["برومو", "promotion", "offre"]);
    map
});

/// The fixed, ordered list of knowledge groups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub groups: Vec<KnowledgeGroup>,
}

impl KnowledgeBase {
    /// Build the full knowledge base for a catalog: category groups derived
    /// from the sections, then the built-in static groups in tier order.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let mut groups = Vec::new();

        for section in &catalog.sections {
            let mut keywords = vec![section.id.clone(), section.title.to_lowercase()];
            if let Some(aliases) = CATEGORY_ALIASES.get(section.id.as_str()) {
                keywords.extend(aliases.iter().map(|a| a.to_string()));
            }
            groups.push(KnowledgeGroup {
                name: section.id.clone(),
                tier: GroupTier::Category,
                keywords,
                reply: ReplyPayload::None,
                laughter: false,
            });
        }

        groups.extend(Self::builtin_groups());
        tracing::debug!(groups = groups.len(), "knowledge base constructed");
        Self { groups }
    }

    /// The static groups, independent of the catalog
    fn builtin_groups() -> Vec<KnowledgeGroup> {
        vec![
            // Mood / preference
            KnowledgeGroup::new(
                "mood_spicy",
                GroupTier::Mood,
                &["spicy", "har", "harr", "harra", "7ar", "piquant", "حار", "حارة"],
                bilingual(
                    "Ila bghiti l7arr, jarreb Tacos Mixte wla Kabab Royal m3a sauce harissa 🔥",
                    "إلى بغيتي الحار، جرب طاكوس ميكست ولا كباب روايال مع صلصة هريسة 🔥",
                ),
            ),
            KnowledgeGroup::new(
                "mood_budget",
                GroupTier::Mood,
                &["cheap", "rkhis", "rkhisa", "promo", "promotion", "budget", "رخيص", "بروموسيون"],
                bilingual(
                    "3ndna promotions zwinin: Menu Midi b 20 dh w Family Deal b 95 dh!",
                    "عندنا عروض زوينين: منو ميدي ب 20 درهم وفاميلي ديل ب 95 درهم!",
                ),
            ),
            KnowledgeGroup::new(
                "mood_hungry",
                GroupTier::Mood,
                &["hungry", "ji3an", "ji3ana", "jou3", "faim", "جعان", "جوع", "جوعان"],
                variants(&[
                    "Ji3an? Jiti l blasstek! Goul liya ach bghiti: pizza, tacos, wla plat? 😋",
                    "Maknach njiw3ok hna 😄 chno ydir lik lferha lyoum?",
                    "3ndna dwa dyal jou3: tacos mixte kbir! Wla tfdl chouf l menu.",
                ]),
            ),
            // FAQ
            KnowledgeGroup::new(
                "faq_hours",
                GroupTier::Faq,
                &["hours", "open", "closed", "ferme", "ouvert", "wa9t", "mfto7", "horaire", "وقت", "مفتوح", "مغلق"],
                bilingual(
                    "7na m7lolin kol nhar mn 11:00 l 23:00 🕚",
                    "حنا محلولين كل نهار من 11:00 حتى 23:00 🕚",
                ),
            ),
            KnowledgeGroup::new(
                "faq_location",
                GroupTier::Faq,
                &["fin", "location", "adresse", "map", "فين", "عنوان", "بلاصة"],
                bilingual(
                    "Katl9ana f centre ville, 12 Avenue Hassan II. Mr7ba bik! 📍",
                    "كاتلقانا في وسط المدينة، 12 شارع الحسن الثاني. مرحبا بيك! 📍",
                ),
            ),
            KnowledgeGroup::new(
                "faq_delivery",
                GroupTier::Faq,
                &["livraison", "delivery", "toseel", "tawsil", "توصيل", "ليفريزون"],
                bilingual(
                    "Kandiro livraison! Frais 3la 7sab lmasafa: 7 dh, 12 dh wla 20 dh.",
                    "كانديرو التوصيل! الثمن على حساب المسافة: 7 دراهم، 12 درهم ولا 20 درهم.",
                ),
            ),
            KnowledgeGroup::new(
                "faq_payment",
                GroupTier::Faq,
                &["payment", "paiement", "khlass", "carte", "خلاص", "كارط"],
                bilingual(
                    "Kan9eblo cash w carte bancaire, kifma bghiti.",
                    "كانقبلو الكاش والكارط البنكية، كيفما بغيتي.",
                ),
            ),
            // General greeting
            KnowledgeGroup::new(
                "greeting",
                GroupTier::Greeting,
                &["salam", "slm", "salut", "hello", "hi", "hey", "bonjour", "cc", "coucou", "السلام", "سلام", "اهلا"],
                variants(&[
                    "Salam! Mr7ba bik 😄 ach bghiti takol lyoum?",
                    "Wa 3alaykom salam! Ach n9dmo lik?",
                    "Salam salam! Goul liya ghir ach bghiti w 7na hna.",
                ]),
            ),
            // Time-of-day greetings
            KnowledgeGroup::new(
                "greeting_morning",
                GroupTier::TimeGreeting,
                &["sbah", "sba7", "lkhir", "morning", "صباح", "الخير"],
                bilingual(
                    "Sbah lkhir! ☀️ Bdina sbi7atna b ftour zwin? Chouf l menu!",
                    "صباح الخير! ☀️ نبداو صباحنا بفطور زوين؟ شوف المنو!",
                ),
            ),
            KnowledgeGroup::new(
                "greeting_night",
                GroupTier::TimeGreeting,
                &["layla", "night", "tsba7", "tsbah", "bonne", "nuit", "ليلة", "تصبح"],
                bilingual(
                    "Tsba7 3la khir! 🌙 Ila ja3ti f lil, 7na m7lolin 7ta l 23:00.",
                    "تصبح على خير! 🌙 إلى جعتي فالليل، حنا محلولين حتى 23:00.",
                ),
            ),
            // Scripted human-check flow (exact phrases)
            KnowledgeGroup::new(
                "human_check",
                GroupTier::HumanFlow,
                &[
                    "wach nta robot",
                    "nta robot",
                    "are you a robot",
                    "wach nta bot",
                    "واش نتا روبوت",
                ],
                bilingual(
                    "Ana bot, walakin kanfhem darija mzyan 😄 Goul liya ach bghiti takol!",
                    "أنا روبوت، ولكن كانفهم الدارجة مزيان 😄 قول ليا أش بغيتي تاكل!",
                ),
            ),
            KnowledgeGroup::new(
                "human_agent",
                GroupTier::HumanFlow,
                &[
                    "bghit nhdar m3a chi had",
                    "talk to human",
                    "bghit insan",
                    "بغيت نهضر مع شي حد",
                ],
                bilingual(
                    "Mafhemtich? 3eyet lina nichan w ghadi yjawbek chi had mn l equipe 📞",
                    "مافهمتيش؟ عيط لينا نيشان وغادي يجاوبك شي حد من الفريق 📞",
                ),
            ),
            // Personality / witty comebacks (exact words)
            KnowledgeGroup::new(
                "personality_insult",
                GroupTier::Personality,
                &["hmar", "7mar", "stupid", "bete", "حمار"],
                variants(&[
                    "Wili wili 😅 ana ghir bot msiken, ma3ndi 7ta dnb. Ach bghiti takol?",
                    "Hadchi ma ghaybdelch l7al, walakin tacos skhoun ymken 😄",
                ]),
            ),
            KnowledgeGroup::new(
                "personality_love",
                GroupTier::Personality,
                &["nbghik", "love", "كنبغيك"],
                variants(&[
                    "W ana nbghik ktar mn lmelwi skhon ❤️ Ach nwjdo lik?",
                    "L7ob l7a9i9i howa pizza skhuna 🍕 Nzidoha f commande?",
                ]),
            ),
            // Domain Q&A
            KnowledgeGroup::new(
                "qa_halal",
                GroupTier::DomainQa,
                &["halal", "حلال"],
                bilingual(
                    "Kolchi 3ndna halal 100%, l7m mn jazzar m3rof.",
                    "كلشي عندنا حلال 100%، اللحم من جزار معروف.",
                ),
            ),
            KnowledgeGroup::new(
                "qa_fresh",
                GroupTier::DomainQa,
                &["fresh", "frais", "tari", "طري"],
                bilingual(
                    "Kolchi kayestnjez f lwe9t, makayn walo surgelé.",
                    "كلشي كايتوجد فالوقت، ماكاين والو مجمد.",
                ),
            ),
            // Emotional tone
            KnowledgeGroup::new(
                "emotion_laugh",
                GroupTier::Emotional,
                &["hhh", "lol", "hahaha", "مضحك", "ههه"],
                variants(&[
                    "Hahaha 😄 d7kna, daba ngolik ach nakol: chouf l menu!",
                    "Hhhh nta nadi! Yallah nraj3o l lmohim: ach bghiti takol?",
                ]),
            )
            .with_laughter(),
            KnowledgeGroup::new(
                "emotion_sad",
                GroupTier::Emotional,
                &["7zin", "sad", "triste", "حزين", "مقهور"],
                bilingual(
                    "Matb9ach 7zin, makla zwina katsali kolchi 🤗 Goul liya ach nwjdo lik.",
                    "ماتبقاش حزين، ماكلة زوينة كاتسالي كلشي 🤗 قول ليا أش نوجدو ليك.",
                ),
            ),
            KnowledgeGroup::new(
                "emotion_angry",
                GroupTier::Emotional,
                &["m3asseb", "angry", "énervé", "معصب", "غاضب"],
                bilingual(
                    "Hani hani 😌 goul liya ach wa9e3 w ghadi n7awlo nsl7oh.",
                    "هاني هاني 😌 قول ليا أش واقع وغادي نحاولو نصلحوه.",
                ),
            ),
            // Events
            KnowledgeGroup::new(
                "event_ramadan",
                GroupTier::Event,
                &["ramadan", "ftour", "s7or", "رمضان", "فطور", "سحور"],
                bilingual(
                    "Ramadan karim! 3ndna offre ftour special: harira + chebakia + plat.",
                    "رمضان كريم! عندنا عرض فطور خاص: حريرة + شباكية + طبق.",
                ),
            ),
            KnowledgeGroup::new(
                "event_aid",
                GroupTier::Event,
                &["aid", "eid", "3id", "عيد", "مبروك"],
                bilingual(
                    "3id mobarek sa3id! Nsherko frahtkom b promotion 3la l family deals 🎉",
                    "عيد مبارك سعيد! نشاركو فرحتكم بعرض على الفاميلي ديل 🎉",
                ),
            ),
        ]
    }

    /// Append groups from a YAML file, after the built-in ones
    ///
    /// A later group only wins with a strictly greater score, so appended
    /// groups extend the base without reshuffling precedence.
    pub fn extend_from_yaml<P: AsRef<Path>>(&mut self, path: P) -> Result<(), NluError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            NluError::FileNotFound(path.as_ref().display().to_string(), e.to_string())
        })?;
        let extra: Vec<KnowledgeGroup> =
            serde_yaml::from_str(&content).map_err(|e| NluError::ParseError(e.to_string()))?;
        self.groups.extend(extra);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&KnowledgeGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
