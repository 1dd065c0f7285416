//! Fixed catalog vocabularies

use crate::filter::RatingCategory;

pub const GENRES: &[&str] = &[
    "Documentary", "Horror", "Sci-Fi", "Comedy", "Drama", "Thriller", "Action", "Romance",
    "Mystery", "Western", "War", "Experimental", "Adventure", "Fantasy", "Animation",
    "History", "Noir", "Musical", "Short",
];

pub const LANGUAGES: &[&str] = &[
    "English", "Portuguese", "Spanish", "French", "German", "Silent", "Italian", "Japanese",
    "Russian", "Czech", "Hebrew", "Chinese", "Korean",
];

pub const COLORS: &[&str] = &["Black & White", "Color", "Mixed"];

pub const DECADES: &[i32] = &[1900, 1910, 1920, 1930, 1940, 1950, 1960, 1970];

pub const THEMES: &[&str] = &[
    "Racism", "LGBTQIA+", "Justice", "Identity", "Economy", "Ethnoracial", "Religious",
    "Rebellion", "Social Inequality", "Feminism", "War & Peace", "Corruption", "Mental Health",
    "Environment", "Colonialism", "Family Dynamics", "Urban Life", "Surrealism",
];

pub const RATING_CATEGORIES: &[RatingCategory] = &[
    RatingCategory { id: "pessimo", label_en: "Awful (0-2)", label_pt: "Péssimo (0-2)", min: 0.0, max: 2.9 },
    RatingCategory { id: "ruim", label_en: "Bad (3-5)", label_pt: "Ruim (3-5)", min: 3.0, max: 5.9 },
    RatingCategory { id: "moderado", label_en: "Moderate (6-7)", label_pt: "Moderado (6-7)", min: 6.0, max: 7.9 },
    RatingCategory { id: "bom", label_en: "Good (8)", label_pt: "Bom (8)", min: 8.0, max: 8.9 },
    RatingCategory { id: "excelente", label_en: "Excellent (9-10)", label_pt: "Excelente (9-10)", min: 9.0, max: 10.0 },
];

pub const MOST_WATCHED_MOVIES: &[&str] = &[
    "1. A Noite dos Mortos-Vivos", "2. Charada", "3. Nosferatu", "4. Metrópolis", "5. Steamboat Willie",
    "6. Em Busca do Ouro", "7. O Encouraçado Potemkin", "8. Viagem à Lua", "9. O General", "10. Nada de Novo no Front",
    "11. Jejum de Amor (His Girl Friday)", "12. O Gabinete do Dr. Caligari", "13. A Paixão de Joana d’Arc", "14. O Fantasma da Ópera", "15. Plan 9 from Outer Space",
    "16. O Garoto (The Kid)", "17. A Pequena Loja de Horrores", "18. Um Homem com uma Câmera", "19. Häxan", "20. O Anjo Azul",
    "21. A Casa dos Maus Espíritos", "22. Carnival of Souls", "23. As Viagens de Gulliver", "24. O Estranho (The Stranger)", "25. Reefer Madness",
    "26. Sherlock Jr.", "27. Um Cão Andaluz", "28. Abraham Lincoln", "29. Santa Fe Trail", "30. Raja Harishchandra",
];

/// Catalog page size used by "load more"
pub const PAGE_SIZE: usize = 48;
