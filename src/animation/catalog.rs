//! Default label catalogue: the content categories carried by fragments

use crate::animation::states::LabelRecord;

/// Hard cap on fragments per explosion
pub const MAX_FRAGMENTS: usize = 11;

const BLUE: u32 = 0x4a4aff;
const LIME: u32 = 0xd4e157;

const DEFAULT_LABELS: [(&str, &str, &str); MAX_FRAGMENTS] = [
    ("Technology", "Cutting-edge technological innovations and digital solutions that drive modern chemistry forward.", "/technology"),
    ("Fabrication", "Advanced manufacturing processes and materials engineering for next-generation products.", "/fabrication"),
    ("Design", "Creative design thinking and aesthetic solutions that merge form with chemical function.", "/design"),
    ("AVL", "Analysis, Validation, and Laboratory services ensuring quality and compliance.", "/avl"),
    ("About", "Our story, mission, and the chemistry that drives our passion for innovation.", "/about"),
    ("Experiential", "Immersive experiences that bring chemistry to life through interactive demonstrations.", "/experiential"),
    ("Experimental", "Research and development laboratory where we push the boundaries of possibility.", "/experimental"),
    ("Community", "Building connections and fostering collaboration within the global chemistry community.", "/community"),
    ("NYC", "Our New York City hub - where urban energy meets chemical innovation.", "/nyc"),
    ("Ethos", "Our core values and ethical principles that guide every chemical reaction we create.", "/ethos"),
    ("People", "The brilliant minds and passionate scientists who make our chemistry possible.", "/people"),
];

/// The eleven built-in categories, alternating blue / lime
pub fn default_labels() -> Vec<LabelRecord> {
    DEFAULT_LABELS
        .iter()
        .enumerate()
        .map(|(i, (name, description, link))| LabelRecord {
            name: name.to_string(),
            description: description.to_string(),
            color: if i % 2 == 0 { BLUE } else { LIME },
            link: link.to_string(),
        })
        .collect()
}
