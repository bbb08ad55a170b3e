//! Secret word supply.
//!
//! Setup draws one secret word from a [`WordSupplier`]. [`WordList`] is the
//! built-in categorized pool; [`FixedWord`] always returns the same word.

use super::rng::GameRng;

pub trait WordSupplier: Send + Sync {
    fn random_word(&self, rng: &mut dyn GameRng) -> String;
}

#[derive(Debug)]
pub struct WordCategory {
    pub name: &'static str,
    pub words: &'static [&'static str],
}

impl WordCategory {
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(word.trim()))
    }
}

pub static WORD_CATEGORIES: &[WordCategory] = &[
    WordCategory {
        name: "Animals",
        words: &[
            "elephant", "penguin", "dolphin", "butterfly", "octopus", "kangaroo", "peacock",
            "chameleon", "giraffe", "flamingo", "hedgehog", "cheetah", "porcupine", "platypus",
            "armadillo", "jellyfish", "hummingbird", "crocodile", "rhinoceros", "sloth", "dog",
            "cat", "horse", "rabbit", "lion", "tiger", "bear", "monkey", "snake", "fish", "bird",
            "cow", "pig", "sheep", "chicken", "duck", "frog", "turtle", "mouse", "squirrel",
        ],
    },
    WordCategory {
        name: "Food",
        words: &[
            "pizza", "sushi", "chocolate", "pancake", "hamburger", "avocado", "croissant",
            "spaghetti", "burrito", "cheesecake", "pretzel", "lasagna", "dumpling", "waffle",
            "tiramisu", "quesadilla", "bruschetta", "macaroni", "omelette", "smoothie", "apple",
            "banana", "orange", "bread", "cheese", "egg", "rice", "soup", "salad", "sandwich",
            "cookie", "cake", "ice cream", "popcorn", "hotdog", "taco", "noodles", "steak",
            "chicken", "coffee",
        ],
    },
    WordCategory {
        name: "Places",
        words: &[
            "beach", "mountain", "castle", "library", "museum", "airport", "stadium",
            "lighthouse", "temple", "aquarium", "skyscraper", "vineyard", "canyon", "pyramid",
            "waterpark", "observatory", "greenhouse", "monastery", "bazaar", "planetarium",
            "school", "hospital", "park", "store", "restaurant", "hotel", "church", "office",
            "farm", "zoo", "mall", "gym", "bank", "bakery", "cinema", "garden", "kitchen",
            "bedroom", "bathroom", "garage",
        ],
    },
    WordCategory {
        name: "Objects",
        words: &[
            "umbrella", "telescope", "compass", "hourglass", "chandelier", "keyboard",
            "microscope", "parachute", "trampoline", "kaleidoscope", "harmonica", "typewriter",
            "binoculars", "thermometer", "accordion", "metronome", "snowglobe", "boomerang",
            "dreamcatcher", "lantern", "phone", "book", "chair", "table", "lamp", "clock",
            "mirror", "pillow", "blanket", "towel", "cup", "plate", "fork", "spoon", "knife",
            "key", "door", "window", "bottle", "bag",
        ],
    },
    WordCategory {
        name: "Nature",
        words: &[
            "volcano", "rainbow", "waterfall", "tornado", "glacier", "aurora", "earthquake",
            "lightning", "avalanche", "geyser", "monsoon", "eclipse", "blizzard", "sunrise",
            "constellation", "thunderstorm", "quicksand", "stalactite", "whirlpool", "sandstorm",
            "tree", "flower", "grass", "river", "lake", "ocean", "forest", "desert", "island",
            "hill", "rock", "sand", "cloud", "sun", "moon", "star", "rain", "snow", "wind",
            "leaf",
        ],
    },
    WordCategory {
        name: "Transportation",
        words: &[
            "submarine", "helicopter", "skateboard", "motorcycle", "sailboat", "spaceship",
            "gondola", "locomotive", "hovercraft", "ambulance", "rickshaw", "scooter", "trolley",
            "kayak", "zeppelin", "monorail", "segway", "catamaran", "bulldozer", "firetruck",
            "car", "bus", "train", "plane", "boat", "bike", "truck", "taxi", "van", "bicycle",
            "ship", "ferry", "tractor", "rocket", "canoe",
        ],
    },
    WordCategory {
        name: "Professions",
        words: &[
            "astronaut", "detective", "magician", "architect", "scientist", "firefighter", "chef",
            "pilot", "veterinarian", "archaeologist", "journalist", "surgeon", "lifeguard",
            "pharmacist", "electrician", "librarian", "diplomat", "choreographer", "blacksmith",
            "cartographer", "doctor", "teacher", "nurse", "police", "farmer", "driver", "artist",
            "singer", "dancer", "actor", "writer", "lawyer", "dentist", "baker", "plumber",
            "waiter", "barber", "coach", "soldier", "photographer",
        ],
    },
    WordCategory {
        name: "Entertainment",
        words: &[
            "concert", "carnival", "karaoke", "fireworks", "circus", "orchestra", "festival",
            "theater", "rollercoaster", "puppetshow", "videogame", "masquerade", "magicshow",
            "parade", "ballet", "acrobatics", "standup", "haunted", "talent", "gameshow", "movie",
            "party", "dancing", "singing", "camping", "picnic", "birthday", "wedding", "vacation",
            "holiday",
        ],
    },
    WordCategory {
        name: "Sports",
        words: &[
            "basketball", "surfing", "archery", "wrestling", "gymnastics", "snowboarding",
            "volleyball", "fencing", "badminton", "bowling", "marathon", "skateboarding",
            "karate", "lacrosse", "rowing", "soccer", "football", "baseball", "tennis", "golf",
            "swimming", "running", "boxing", "hockey", "skiing", "cycling", "climbing", "fishing",
            "hiking", "yoga",
        ],
    },
    WordCategory {
        name: "Mythology",
        words: &[
            "dragon", "unicorn", "phoenix", "mermaid", "centaur", "griffin", "werewolf", "kraken",
            "minotaur", "pegasus", "cyclops", "sphinx", "leprechaun", "vampire", "yeti", "fairy",
            "wizard", "witch", "ghost", "zombie", "giant", "elf", "goblin", "troll", "angel",
        ],
    },
    WordCategory {
        name: "Weather",
        words: &[
            "hurricane", "drizzle", "heatwave", "foggy", "sleet", "hailstorm", "frosty",
            "overcast", "muggy", "breeze", "downpour", "sunshine", "misty", "cloudburst",
            "windchill", "rainy", "sunny", "cloudy", "stormy", "snowy", "windy", "cold", "hot",
            "warm", "humid",
        ],
    },
    WordCategory {
        name: "Music",
        words: &[
            "guitar", "saxophone", "violin", "drums", "piano", "trumpet", "flute", "ukulele",
            "cello", "xylophone", "bagpipes", "banjo", "clarinet", "tambourine", "synthesizer",
            "harp", "bell", "whistle", "microphone", "speaker",
        ],
    },
    WordCategory {
        name: "Clothing",
        words: &[
            "shirt", "pants", "dress", "shoes", "hat", "jacket", "socks", "gloves", "scarf",
            "belt", "tie", "sweater", "jeans", "boots", "sandals", "coat", "shorts", "skirt",
            "hoodie", "pajamas", "uniform", "swimsuit", "glasses", "watch", "ring",
        ],
    },
    WordCategory {
        name: "Body Parts",
        words: &[
            "hand", "foot", "head", "eye", "ear", "nose", "mouth", "arm", "leg", "finger", "toe",
            "knee", "elbow", "shoulder", "neck", "back", "stomach", "heart", "brain", "teeth",
        ],
    },
    WordCategory {
        name: "Household",
        words: &[
            "bed", "sofa", "television", "refrigerator", "stove", "microwave", "dishwasher",
            "washing machine", "vacuum", "toaster", "blender", "fan", "heater", "shower",
            "bathtub", "toilet", "sink", "oven", "closet", "drawer", "shelf", "carpet", "curtain",
            "doorbell", "stairs",
        ],
    },
    WordCategory {
        name: "School",
        words: &[
            "pencil", "pen", "paper", "notebook", "backpack", "desk", "chalkboard", "eraser",
            "ruler", "scissors", "glue", "crayon", "marker", "calculator", "globe", "homework",
            "exam", "teacher", "student", "classroom",
        ],
    },
    WordCategory {
        name: "Toys and Games",
        words: &[
            "ball", "doll", "puzzle", "blocks", "kite", "balloon", "swing", "slide", "seesaw",
            "teddy bear", "robot", "cards", "dice", "chess", "checkers", "lego", "frisbee",
            "yoyo", "jump rope", "board game",
        ],
    },
    WordCategory {
        name: "Colors and Shapes",
        words: &[
            "red", "blue", "green", "yellow", "orange", "purple", "pink", "black", "white",
            "brown", "circle", "square", "triangle", "rectangle", "star", "diamond", "oval",
            "cube", "sphere", "pyramid",
        ],
    },
    WordCategory {
        name: "Emotions",
        words: &[
            "happy", "sad", "angry", "scared", "surprised", "excited", "tired", "hungry",
            "nervous", "proud", "lonely", "confused", "bored", "jealous", "grateful",
            "embarrassed", "hopeful", "curious", "silly", "brave",
        ],
    },
    WordCategory {
        name: "Actions",
        words: &[
            "running", "jumping", "sleeping", "eating", "drinking", "reading", "writing",
            "talking", "laughing", "crying", "walking", "sitting", "standing", "dancing",
            "singing", "cooking", "cleaning", "driving", "flying", "swimming",
        ],
    },
];

/// Uniform draw over every word of every category.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordList;

impl WordList {
    pub fn words() -> impl Iterator<Item = &'static str> {
        WORD_CATEGORIES.iter().flat_map(|c| c.words.iter().copied())
    }

    pub fn len() -> usize {
        WORD_CATEGORIES.iter().map(|c| c.words.len()).sum()
    }

    /// First category listing `word`. Some words (e.g. "chicken") appear in
    /// more than one category.
    pub fn category_of(word: &str) -> Option<&'static WordCategory> {
        WORD_CATEGORIES.iter().find(|c| c.contains(word))
    }

    pub fn random_from_category(name: &str, rng: &mut dyn GameRng) -> Option<String> {
        let category = WORD_CATEGORIES.iter().find(|c| c.name == name)?;
        if category.words.is_empty() {
            return None;
        }
        Some(category.words[rng.pick_index(category.words.len())].to_string())
    }
}

impl WordSupplier for WordList {
    fn random_word(&self, rng: &mut dyn GameRng) -> String {
        let idx = rng.pick_index(Self::len());
        Self::words()
            .nth(idx)
            .map(str::to_string)
            .unwrap_or_else(|| WORD_CATEGORIES[0].words[0].to_string())
    }
}

#[derive(Clone, Debug)]
pub struct FixedWord(pub String);

impl FixedWord {
    pub fn new(word: &str) -> Self {
        Self(word.to_string())
    }
}

impl WordSupplier for FixedWord {
    fn random_word(&self, _rng: &mut dyn GameRng) -> String {
        self.0.clone()
    }
}
