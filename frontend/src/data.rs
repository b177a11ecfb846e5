#[derive(Clone, Debug, PartialEq)]
pub struct PainPoint {
    pub image: &'static str,
    pub thought: &'static str,
    pub stress_level: u8,
    pub stress_label: &'static str,
    pub priority: bool,
}

pub const PAIN_POINTS: &[PainPoint] = &[
    PainPoint {
        image: "https://i.imgur.com/CIwGgT0.jpeg",
        thought: "I thought the interview went well... why haven't they replied for 2 weeks?",
        stress_level: 5,
        stress_label: "CRITICAL",
        priority: true,
    },
    PainPoint {
        image: "https://i.imgur.com/0KWA3bV.jpeg",
        thought: "My hands are shaking. I hope they don't notice I'm sweating.",
        stress_level: 4,
        stress_label: "HIGH",
        priority: false,
    },
    PainPoint {
        image: "https://i.imgur.com/0rWxrTT.jpeg",
        thought: "I know the answer, why can't I speak? I'm rambling again.",
        stress_level: 4,
        stress_label: "MODERATE",
        priority: false,
    },
    PainPoint {
        image: "https://i.imgur.com/YQwah6P.jpeg",
        thought: "RM2,500? I have a degree. Should I just accept it?",
        stress_level: 5,
        stress_label: "SEVERE",
        priority: false,
    },
    PainPoint {
        image: "https://i.imgur.com/fna5wck.jpeg",
        thought: "I keep repeating the same mistakes because I have no system to review or improve.",
        stress_level: 4,
        stress_label: "STUCK",
        priority: false,
    },
    PainPoint {
        image: "https://i.imgur.com/2kp0moS.jpeg",
        thought: "I can't show real proof of impact. My answers sound vague, not impressive.",
        stress_level: 5,
        stress_label: "FRUSTRATED",
        priority: false,
    },
];

#[derive(Clone, Debug, PartialEq)]
pub struct Testimonial {
    pub name: &'static str,
    pub quote: &'static str,
    pub result: &'static str,
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Aisyah R.",
        quote: "The STAR answer bank alone was worth it. I stopped rambling and finally sounded like I knew my own work.",
        result: "Hired in 3 weeks",
    },
    Testimonial {
        name: "Daniel T.",
        quote: "I used the negotiation script word for word and they came back with a higher offer the next day.",
        result: "+RM800 offer",
    },
    Testimonial {
        name: "Mei Ling C.",
        quote: "Panel interviews used to freeze me. The PAUSE method gave me something to hold on to.",
        result: "2 offers",
    },
    Testimonial {
        name: "Harith Z.",
        quote: "My review tracker showed me I kept making the same three mistakes. Fixed them, got the job.",
        result: "First job",
    },
    Testimonial {
        name: "Priya S.",
        quote: "Clear, practical and short. I went through it the night before and walked in calm.",
        result: "Career switch",
    },
    Testimonial {
        name: "Kelvin W.",
        quote: "The impact-proof templates turned my vague answers into numbers interviewers cared about.",
        result: "Promoted",
    },
];

#[derive(Clone, Debug, PartialEq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[FaqEntry] = &[
    FaqEntry {
        question: "Who is the Interview Success Blueprint for?",
        answer: "Fresh graduates and early-career professionals who get interviews but struggle to turn them into offers.",
    },
    FaqEntry {
        question: "How do I get access after paying?",
        answer: "Checkout is handled by Stripe. You receive the download link by email right after payment.",
    },
    FaqEntry {
        question: "Is this a one-time payment?",
        answer: "Yes. You pay once and keep lifetime access, including future updates.",
    },
    FaqEntry {
        question: "How do I use a discount code?",
        answer: "Enter the code in the pricing card before clicking checkout. The discounted price is shown immediately and carried into checkout.",
    },
    FaqEntry {
        question: "What if it doesn't work for me?",
        answer: "Reply to your receipt email within 7 days and tell us what went wrong. We read every message.",
    },
];

pub const FEATURES: &[&str] = &[
    "50+ ready-to-adapt STAR answers",
    "Salary negotiation scripts",
    "The PAUSE method for curveball questions",
    "Interview review tracker",
    "Impact-proof resume templates",
    "Lifetime updates",
];
