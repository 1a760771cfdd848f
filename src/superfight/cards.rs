use rand::{seq::IndexedRandom, Rng};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub character: &'static str,
    pub attributes: [&'static str; 2],
}

impl Card {
    /// Draws a character and two attributes whose texts differ.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let character = pick(&CHARACTERS, rng);
        let first = pick(&ATTRIBUTES, rng);
        let mut second = pick(&ATTRIBUTES, rng);
        while second == first {
            second = pick(&ATTRIBUTES, rng);
        }
        Self {
            character,
            attributes: [first, second],
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**Character:** {}\n**Attributes:** {}, {}",
            self.character, self.attributes[0], self.attributes[1]
        )
    }
}

fn pick<R: Rng + ?Sized>(table: &[&'static str], rng: &mut R) -> &'static str {
    // tables are non-empty consts
    table.choose(rng).copied().unwrap_or_default()
}

pub const CHARACTERS: [&str; 60] = [
    "Pikachu",
    "Darth plagueis",
    "A killer bee swarm",
    "A tusken raider",
    "Soundwave",
    "A dog",
    "A Dracolich",
    "Baby yoda",
    "A jewel thief",
    "Superman",
    "A t-rex",
    "A shopkin",
    "A tv show character of your choice",
    "A park ranger",
    "Sauron",
    "A porg",
    "A living statue of benjamin franklin",
    "The one and only Ivan",
    "Bossk",
    "A librarian in a fuzzy purple hat",
    "A french butler",
    "A djinn",
    "Spiderman",
    "Andre the giant",
    "Elrond",
    "Manbat",
    "R2d2",
    "An astronaut",
    "Dumbledore",
    "A goat",
    "Count Dracula",
    "Will Treaty",
    "Boba Fett",
    "A video game character of your choice",
    "A satyr",
    "King Arthur",
    "Bad cop",
    "A pile of dynamite",
    "Optimus prime",
    "Lobelia Sackville-Baggins",
    "Tacocat",
    "Gandalf",
    "Attack rag doll",
    "Elsa from frozen",
    "A teletubby",
    "Blackbeard",
    "John Cena",
    "Justin Bieber",
    "Alcatraz prison guard",
    "Davy Jones",
    "C-3P0",
    "The KRACKEN!",
    "A micromanager",
    "A Monster-Trucker",
    "Polly the parrot",
    "A boy-band",
    "A surfer",
    "An airplane pilot",
    "A wyvern",
    "billybobjoe",
];

pub const ATTRIBUTES: [&str; 87] = [
    "Armed with a slimeball launcher",
    "In handcuffs",
    "On a hoverboard",
    "Armed with a taser",
    "Tied to a bed",
    "Has super strength",
    "In Dumbledore's robe",
    "Flying a tie advanced",
    "In full beskar",
    "With the one ring",
    "Wearing a tricorn hat",
    "Has one eye",
    "Had an hour to set up the battlefield beforehand",
    "With a compound bow and 5 arrows",
    "Has the infinity gauntlet with the time stone, space stone, and reality stone",
    "Wearing an explosive bonnet",
    "Has the power of teleportation",
    "With a dwarven thrower",
    "Has one eye",
    "With an army of jesters",
    "On a segway",
    "Magically suspended upside down in midair",
    "Armed with an emotion ray",
    "With an apple on your head",
    "Invisible",
    "Cry's cash",
    "Riding an immortal pig",
    "On a fainting goat",
    "In a mech suit",
    "Armed with a cannon and unlimited cannonballs",
    "Armed with a pulse rifle",
    "Riding an insane dragon with a grudge against the opponent",
    "3 of them",
    "50 of them",
    "100 of them",
    "Wearing a cap of stupidity",
    "With the largest brain ever",
    "Will faint from fright if it sees a tree",
    "Made out of animated lego's",
    "With zeus's lightning bolt",
    "With the palantir",
    "Can speak to birds",
    "Has a head to big for its body",
    "Is as large as godzilla",
    "Constantly shedding cat hair",
    "In a flying car",
    "Armed with a mailbox",
    "Armed with a duck crossing sign",
    "With a purple spud",
    "Suffers from extreme flatulence",
    "Is the ugliest person in the world",
    "Shoots fireballs",
    "Can Use the force",
    "Can Steal an opponent's attributes",
    "In the razor crest",
    "Tied up in used dental floss",
    "Is constantly dancing the robot",
    "Made of sand",
    "Can change corporeality at will",
    "Is foaming at the mouth",
    "Swinging a shark on a chain",
    "Holding a don't touch button",
    "Had plastic surgery",
    "The size of a mouse",
    "That makes chicken noises when they talk",
    "Driving the batmobile",
    "Armed with unlimited tnt",
    "Wielding the sword of summer",
    "With a catapult and unlimited pies",
    "With a rod that can be any projectile weapon in the multiverse",
    "Sucking on a push pop",
    "Balancing on a tightrope",
    "Hooked up to a lie detector",
    "Holding a chapstick",
    "Sitting on a couch",
    "With a glue stick",
    "On whom it is constantly raining, though it is raining nowhere else",
    "Looking down the barrel of a squirt gun",
    "With telepathy",
    "Who can fly",
    "With a ferret that sings twinkle little star everytime it hears a noise",
    "On a bicycle",
    "Named sue",
    "With facepaints",
    "Eating a potato",
    "In a rocking chair",
    "Who can summon meteor strikes at will",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn attributes_always_differ() {
        for seed in 0..2000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let card = Card::draw(&mut rng);
            assert_ne!(card.attributes[0], card.attributes[1], "seed {seed}");
        }
    }

    #[test]
    fn same_seed_same_card() {
        let a = Card::draw(&mut StdRng::seed_from_u64(42));
        let b = Card::draw(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn draws_come_from_tables() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let card = Card::draw(&mut rng);
            assert!(CHARACTERS.contains(&card.character));
            assert!(card.attributes.iter().all(|a| ATTRIBUTES.contains(a)));
        }
    }

    #[test]
    fn renders_like_a_card() {
        let card = Card {
            character: "A goat",
            attributes: ["On a segway", "Invisible"],
        };
        assert_eq!(
            card.to_string(),
            "**Character:** A goat\n**Attributes:** On a segway, Invisible"
        );
    }
}
