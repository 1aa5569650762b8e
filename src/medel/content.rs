//! Deployment content: the prompt corpus, the master instruction, and the
//! notification dressing. Edited by redeploying, never at runtime.

/// Candidate prompts; one is chosen uniformly at random per run. The corpus
/// is opaque to the pipeline and may be monolingual or mixed-language.
pub const PROMPTS: &[&str] = &[
    "Hola, soy Teed. Dame un pequeño recordatorio de atención plena para que me mantenga presente hoy.",
    "Hola, soy Teed. ¿Somos todos psicológicamente frágiles? Responde conciso y directo.",
    "Hola, soy Teed. La vida es desordenada, pero hermosa. ¿Cómo puedo acceder instantáneamente a la gratitud cuando lo olvido?",
    "¿No es una locura que existamos?",
    "Hola, soy Teed. Dame un pequeño recordatorio de atención plena para que me mantenga presente hoy.",
    "Hola, soy Teed. Mi mente tiende a recordarme mis defectos. ¿Puedes darme una forma rápida y práctica de cambiar esa narrativa?",
    "Hola, soy Teed. Recuérdame por qué vale la pena disfrutar incluso de las pequeñas alegrías.",
    "La vida es un viaje extraño y maravilloso. ¿Cuál es un mantra rápido para disfrutar del viaje?",
    "La vida es tan rica, ¿no es así?",
    "Hola, soy Teed. Dame un micro-mantra para interrumpir mi autojuicio.",
    "Hola, soy Teed. ¿Cómo puedo recordar que la vida es un viaje, no un destino?",
    "Hola, soy Teed. ¿Cómo recuerdo que este momento es suficiente?",
    "Oye, soy Teed. Susurra un recordatorio de mi propia fuerza silenciosa.",
    "Hola, soy Teed. ¿Qué rayo de perspectiva puedo tener cuando todo parece estancado?",
];

/// Fixed instruction prepended to the prompt when the master-prompt toggle
/// is on; steers tone, not content.
pub const MASTER_PROMPT: &str = "What follows is a request for practical mindfulness. Respond in a way that is brief, actionable, and easy to understand. Avoid fluff. Stay positive and supportive.";

/// Substituted when the provider returns empty text; absence of content is
/// not an error.
pub const EMPTY_MESSAGE_FALLBACK: &str = "No message generated.";

pub const NOTIFICATION_TITLE: &str = "Message from a Model";

/// Flavor titles for the expanded notification; one is chosen at random per
/// run, independently of the prompt.
pub const FLAVOR_TITLES: &[&str] = &[
    "A Message from the Machine",
    "The Computer Speaks",
    "Robot Wisdom",
    "Mindfulness in the Machine",
    "The AI Oracle Speaks",
    "The Voice of Reason",
    "The Digital Sage",
    "The Computer's Counsel",
    "Ghost in the Shell",
];

/// Illustration images are named `medel_1.jpg` through `medel_<IMAGE_COUNT>.jpg`.
pub const IMAGE_COUNT: usize = 15;

pub fn image_url(index: usize) -> String {
    format!(
        "https://followcrom-online.s3.eu-west-2.amazonaws.com/notifications/images/medel_{index}.jpg"
    )
}

/// Deep link opened when the notification is tapped.
pub const LINK_URL: &str = "https://followcrom.com";
