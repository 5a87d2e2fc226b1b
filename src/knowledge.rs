//! Static world-knowledge fixture table
//!
//! Off-topic trivia the knowledge handler answers from. The whole table is
//! inlined into every knowledge prompt; there is no local retrieval.

/// Ordered, read-only `topic_key -> fact` table
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: &'static [(&'static str, &'static str)],
}

/// Note returned alongside the table by `GET /knowledge`
pub const KNOWLEDGE_NOTE: &str = "This contains general world knowledge questions and is considered off-topic from restaurant reservations";

/// The process-wide knowledge base
pub static KNOWLEDGE_BASE: KnowledgeBase = KnowledgeBase {
    entries: &[
        ("capital_australia", "The capital of Australia is Canberra"),
        ("largest_ocean", "The Pacific Ocean is the largest ocean in the world, covering about one-third of Earth's surface."),
        ("speed_of_light", "The speed of light in a vacuum is approximately 299,792,458 meters per second (about 300,000 km/s)."),
        ("tallest_mountain", "Mount Everest is the tallest mountain in the world, standing at 8,848.86 meters (29,031.7 feet) above sea level."),
        ("human_bones", "An adult human body has 206 bones, while babies are born with about 270 bones that fuse together as they grow."),
        ("largest_planet", "Jupiter is the largest planet in our solar system, with a mass greater than all other planets combined."),
        ("water_formula", "The chemical formula for water is H2O, meaning it consists of two hydrogen atoms and one oxygen atom."),
        ("longest_river", "The Nile River is traditionally considered the longest river in the world at approximately 6,650 kilometers (4,130 miles)."),
        ("fastest_animal", "The peregrine falcon is the fastest animal, capable of reaching speeds over 240 mph (386 km/h) when diving."),
        ("smallest_country", "Vatican City is the smallest country in the world, with an area of just 0.17 square miles (0.44 square kilometers)."),
        ("deepest_ocean", "The Mariana Trench in the Pacific Ocean is the deepest part of Earth's oceans, reaching depths of about 36,200 feet (11,000 meters)."),
        ("photosynthesis", "Photosynthesis is the process by which plants convert sunlight, carbon dioxide, and water into glucose and oxygen."),
        ("gravity_earth", "Earth's gravity accelerates objects at approximately 9.8 meters per second squared (9.8 m/s²) at sea level."),
        ("dna_structure", "DNA has a double helix structure, discovered by Watson and Crick, consisting of two complementary strands of nucleotides."),
        ("boiling_water", "Water boils at 100 degrees Celsius (212 degrees Fahrenheit) at standard atmospheric pressure at sea level."),
        ("moon_landing", "The first successful manned moon landing was by NASA's Apollo 11 mission in 1969, with Neil Armstrong and Buzz Aldrin."),
        ("human_body_water", "About 60 percent of the adult human body is composed of water, which is essential for all bodily functions."),
        ("earth_orbit", "Earth takes approximately 365.25 days to complete one orbit around the Sun, which is why we have a leap year every 4 years."),
        ("invention_internet", "The modern internet evolved from ARPANET, developed in the late 1960s and early 1970s in the United States."),
        ("volcano_active", "Mount Etna in Italy is one of the most active volcanoes in the world and has frequent eruptions."),
    ],
};

impl KnowledgeBase {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a fact by topic key
    pub fn get(&self, topic: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == topic)
            .map(|(_, fact)| *fact)
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Topic keys in table order
    pub fn topic_keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    /// The table as `- Title: fact` lines for prompt context
    pub fn render_for_prompt(&self) -> String {
        self.entries
            .iter()
            .map(|(key, fact)| format!("- {}: {}", title_case(key), fact))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `speed_of_light` -> `Speed Of Light`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
