use tracing::info;

use course_catalog_core::{Category, CourseDraft, LessonDraft, Status};
use course_catalog_storage::{Database, StorageError};

type SeedCourse = (&'static str, Category, Status, &'static [(&'static str, &'static str)]);

const DEMO_CATALOG: &[SeedCourse] = &[
    (
        "Angular Básico",
        Category::Frontend,
        Status::Active,
        &[
            ("Introdução ao Angular", "dQw4w9WgXcQ"),
            ("Componentes e Templates", "oHg5SJYRHA0"),
        ],
    ),
    (
        "Java Spring Boot",
        Category::Backend,
        Status::Active,
        &[
            ("Configuração do Spring Boot", "rRKAktbMNt4"),
            ("REST APIs com Spring", "6NaBfBMnp7Q"),
        ],
    ),
    ("React Avançado", Category::Frontend, Status::Active, &[("Hooks Avançados", "3OGEprdqwFo")]),
    (
        "Python para Data Science",
        Category::DataScience,
        Status::Inactive,
        &[("Pandas Básico", "HW29067qVWk")],
    ),
    ("Docker e Kubernetes", Category::DevOps, Status::Active, &[]),
    (
        "Machine Learning",
        Category::DataScience,
        Status::Active,
        &[
            ("Algoritmos Supervisionados", "aircAruvnKk"),
            ("Redes Neurais", "IHZwWFHWa-w"),
        ],
    ),
    ("TypeScript Completo", Category::Frontend, Status::Active, &[("Tipos Avançados", "ahCwqrYpIuM")]),
    (
        "Banco de Dados SQL",
        Category::Database,
        Status::Active,
        &[
            ("SELECT e JOINs", "XFu3VIj5o2c"),
            ("Índices e Performance", "YufocuHbYZo"),
        ],
    ),
    ("Vue.js Completo", Category::Frontend, Status::Active, &[("Introdução ao Vue", "OrxmtDw4pVI")]),
    (
        "Node.js e Express",
        Category::Backend,
        Status::Active,
        &[("Setup Node.js", "TlB_eWDSMt4"), ("Criando APIs REST", "vjf774RKrLc")],
    ),
    ("Flutter Mobile", Category::Mobile, Status::Active, &[]),
    (
        "React Native",
        Category::Mobile,
        Status::Active,
        &[("Componentes React Native", "0-S5a0eXPoc")],
    ),
    (
        "AWS Fundamentos",
        Category::Cloud,
        Status::Active,
        &[("EC2 Básico", "iHX-jtKghC0"), ("S3 Storage", "tfU0JEZjcsg")],
    ),
    ("Azure DevOps", Category::Cloud, Status::Active, &[]),
    ("Segurança Web", Category::Security, Status::Active, &[("OWASP Top 10", "GchojK3dWFA")]),
    (
        "Ethical Hacking",
        Category::Security,
        Status::Active,
        &[
            ("Penetration Testing", "3Kq1MIfTWCE"),
            ("Network Security", "qiQR5rTSshw"),
        ],
    ),
    ("UI/UX Design", Category::Design, Status::Active, &[("Princípios de UX", "Ovj4hFxko7c")]),
    ("Figma Avançado", Category::Design, Status::Active, &[]),
    (
        "Testes Automatizados",
        Category::Testing,
        Status::Active,
        &[("Unit Testing", "r9HdJ8P6GQI"), ("Integration Tests", "QM1iUe6IofM")],
    ),
    (
        "Jest e Testing Library",
        Category::Testing,
        Status::Active,
        &[("Testing React", "8Xwq35cPwYg")],
    ),
    ("MongoDB Essencial", Category::Database, Status::Active, &[]),
    (
        "PostgreSQL Avançado",
        Category::Database,
        Status::Active,
        &[("Advanced Queries", "qw--VYLpxG4")],
    ),
    (
        "Python Django",
        Category::Backend,
        Status::Active,
        &[("Django Setup", "F5mRW0jo-U4"), ("Django ORM", "rHux0gMZ3Eg")],
    ),
    ("Ruby on Rails", Category::Backend, Status::Active, &[]),
    ("Deep Learning", Category::DataScience, Status::Active, &[("Neural Networks", "aircAruvnKk")]),
    (
        "Terraform e IaC",
        Category::DevOps,
        Status::Active,
        &[
            ("Terraform Basics", "l5k1ai_GBDE"),
            ("Infrastructure as Code", "tomUWcQ0P3k"),
        ],
    ),
    ("CI/CD com Jenkins", Category::DevOps, Status::Active, &[]),
    ("Svelte Framework", Category::Frontend, Status::Active, &[]),
    ("Go para Backend", Category::Backend, Status::Active, &[]),
    ("Kotlin Android", Category::Mobile, Status::Active, &[]),
    ("Google Cloud Platform", Category::Cloud, Status::Active, &[]),
    ("Cypress E2E", Category::Testing, Status::Active, &[]),
    ("GraphQL APIs", Category::Backend, Status::Inactive, &[]),
];

/// Loads the demo catalog into an empty database.
///
/// Returns the number of courses written, which is zero when any course
/// already exists.
pub async fn seed_demo_catalog(database: &Database) -> Result<usize, StorageError> {
    let courses = database.courses();
    if courses.count().await? > 0 {
        info!(stage = "seed", "catalog already populated, skipping demo data");
        return Ok(0);
    }

    let mut lessons = 0;
    for (name, category, status, seeded_lessons) in DEMO_CATALOG {
        let draft = CourseDraft {
            id: None,
            name: (*name).to_string(),
            category: *category,
            status: Some(*status),
            lessons: seeded_lessons
                .iter()
                .map(|(lesson, token)| LessonDraft {
                    id: None,
                    name: (*lesson).to_string(),
                    youtube_url: (*token).to_string(),
                })
                .collect(),
        };
        lessons += courses.insert(&draft).await?.lessons.len();
    }

    info!(
        stage = "seed",
        courses = DEMO_CATALOG.len(),
        lessons,
        "demo catalog loaded"
    );
    Ok(DEMO_CATALOG.len())
}
