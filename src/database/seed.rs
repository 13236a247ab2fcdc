use crate::database::models::NewsDraft;

/// Sample stories inserted into an empty store during development.
pub fn sample_news() -> Vec<NewsDraft> {
    vec![
        NewsDraft {
            title: "Fichaje bomba: Manchester City cierra la contratación del año".to_string(),
            summary: Some(
                "El equipo inglés confirma la llegada de una de las estrellas más prometedoras del fútbol mundial."
                    .to_string(),
            ),
            image: Some(
                "https://images.unsplash.com/photo-1522778119026-d647f0596c20?w=400&h=250&fit=crop"
                    .to_string(),
            ),
            category: Some("Fichajes".to_string()),
            time: Some("Hace 15 minutos".to_string()),
        },
        NewsDraft {
            title: "Champions League: Definidos los cruces de semifinales".to_string(),
            summary: Some("Los cuatro mejores equipos de Europa conocen a sus rivales.".to_string()),
            image: Some(
                "https://images.unsplash.com/photo-1574629810360-7efbbe195018?w=400&h=250&fit=crop"
                    .to_string(),
            ),
            category: Some("Competiciones".to_string()),
            time: Some("Hace 1 hora".to_string()),
        },
        NewsDraft {
            title: "Lesión de última hora afecta al equipo líder".to_string(),
            summary: Some("El delantero estrella estará fuera por 6 semanas.".to_string()),
            image: Some(
                "https://images.unsplash.com/photo-1579952363873-27f3bade9f55?w=400&h=250&fit=crop"
                    .to_string(),
            ),
            category: Some("Lesiones".to_string()),
            time: Some("Hace 2 horas".to_string()),
        },
    ]
}
