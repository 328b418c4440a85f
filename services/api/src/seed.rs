//! Demo catalog loaded by `serve --seed` and the `seo` command.

use realty_site::content::{
    ContentDraft, ContentKind, ContentStatus, Locale, MultilingualValue, SeoFields,
};
use realty_site::error::ApiError;
use realty_site::property::{ListingType, PropertyDraft, PropertyStatus};

use crate::infra::Stores;

#[derive(Debug, Default)]
pub(crate) struct SeedSummary {
    pub(crate) property_ids: Vec<String>,
    pub(crate) blog_slugs: Vec<String>,
    pub(crate) content_records: usize,
}

pub(crate) fn load(stores: &Stores) -> Result<SeedSummary, ApiError> {
    let content = stores.content_service();
    let properties = stores.property_service();
    let mut summary = SeedSummary::default();

    for draft in demo_properties() {
        let property = properties.create(draft)?;
        summary.property_ids.push(property.id.0);
    }

    for (kind, draft) in demo_content() {
        let record = content.create(kind, draft)?;
        if kind == ContentKind::Blog {
            summary.blog_slugs.push(record.slug.get(Locale::En).to_string());
        }
        summary.content_records += 1;
    }

    tracing::info!(
        properties = summary.property_ids.len(),
        content = summary.content_records,
        "demo catalog loaded"
    );
    Ok(summary)
}

fn text(en: &str, ar: &str, fr: &str) -> MultilingualValue {
    MultilingualValue::new(en, ar, fr)
}

fn demo_properties() -> Vec<PropertyDraft> {
    vec![
        PropertyDraft {
            title: text(
                "Sea-view villa in Anfa",
                "فيلا بإطلالة على البحر في أنفا",
                "Villa vue mer à Anfa",
            ),
            description: text(
                "Five-bedroom villa with a garden, pool and direct ocean views.",
                "فيلا من خمس غرف نوم مع حديقة ومسبح وإطلالة مباشرة على المحيط.",
                "Villa de cinq chambres avec jardin, piscine et vue directe sur l'océan.",
            ),
            location: text("Anfa, Casablanca", "أنفا، الدار البيضاء", "Anfa, Casablanca"),
            price: 8_500_000,
            currency: Some("mad".to_string()),
            listing: ListingType::Sale,
            property_type: "villa".to_string(),
            bedrooms: 5,
            bathrooms: 4,
            area_sqm: 420,
            images: vec!["/images/properties/anfa-villa.jpg".to_string()],
            status: PropertyStatus::Available,
            featured: true,
            seo: SeoFields::default(),
        },
        PropertyDraft {
            title: text(
                "Riad apartment near the medina",
                "شقة رياض قرب المدينة القديمة",
                "Appartement riad près de la médina",
            ),
            description: text(
                "Restored two-bedroom apartment with a shared courtyard.",
                "شقة مرممة من غرفتي نوم مع فناء مشترك.",
                "Appartement restauré de deux chambres avec patio partagé.",
            ),
            location: text("Medina, Marrakech", "المدينة، مراكش", "Médina, Marrakech"),
            price: 9_000,
            currency: None,
            listing: ListingType::Rent,
            property_type: "apartment".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            area_sqm: 95,
            images: vec!["/images/properties/medina-riad.jpg".to_string()],
            status: PropertyStatus::Available,
            featured: false,
            seo: SeoFields::default(),
        },
        PropertyDraft {
            title: text(
                "Office floor in Hay Riad",
                "طابق مكاتب في حي الرياض",
                "Plateau de bureaux à Hay Riad",
            ),
            description: text(
                "Open-plan office floor with parking, ready to move in.",
                "طابق مكاتب مفتوح مع موقف سيارات، جاهز للاستعمال.",
                "Plateau de bureaux ouvert avec parking, prêt à l'emploi.",
            ),
            location: text("Hay Riad, Rabat", "حي الرياض، الرباط", "Hay Riad, Rabat"),
            price: 3_200_000,
            currency: None,
            listing: ListingType::Sale,
            property_type: "office".to_string(),
            bedrooms: 0,
            bathrooms: 2,
            area_sqm: 310,
            images: Vec::new(),
            status: PropertyStatus::Reserved,
            featured: false,
            seo: SeoFields::default(),
        },
    ]
}

fn published(
    title: MultilingualValue,
    excerpt: MultilingualValue,
    body: MultilingualValue,
) -> ContentDraft {
    ContentDraft {
        title,
        excerpt,
        content: body,
        status: ContentStatus::Published,
        ..ContentDraft::default()
    }
}

fn demo_content() -> Vec<(ContentKind, ContentDraft)> {
    let mut buying_guide = published(
        text(
            "Buying property in Morocco as a foreigner",
            "شراء عقار في المغرب كأجنبي",
            "Acheter un bien au Maroc en tant qu'étranger",
        ),
        text(
            "Notaries, fees and the steps from offer to title deed.",
            "الموثقون والرسوم والخطوات من العرض إلى سند الملكية.",
            "Notaires, frais et étapes de l'offre au titre foncier.",
        ),
        text(
            "<p>Foreign buyers can acquire most urban property freely.</p>",
            "<p>يمكن للمشترين الأجانب تملك معظم العقارات الحضرية بحرية.</p>",
            "<p>Les acheteurs étrangers peuvent acquérir librement la plupart des biens urbains.</p>",
        ),
    );
    buying_guide.category = text("Guides", "أدلة", "Guides");
    buying_guide.tags = vec![
        text("buying", "شراء", "achat"),
        text("legal", "قانوني", "juridique"),
    ];
    buying_guide.featured = true;
    buying_guide.author = Some("Editorial team".to_string());
    buying_guide.featured_image = Some("/images/blog/buying-guide.jpg".to_string());

    let mut market = published(
        text(
            "Casablanca rental market update",
            "مستجدات سوق الكراء في الدار البيضاء",
            "Point sur le marché locatif à Casablanca",
        ),
        text(
            "Where rents are moving and which districts stay in demand.",
            "",
            "L'évolution des loyers et les quartiers les plus demandés.",
        ),
        text(
            "<p>Demand stays strongest around Maarif and Gauthier.</p>",
            "",
            "<p>La demande reste la plus forte autour du Maârif et de Gauthier.</p>",
        ),
    );
    market.category = text("Market", "السوق", "Marché");

    let draft_post = ContentDraft {
        title: text("Upcoming: new developments in Tangier", "", ""),
        status: ContentStatus::Draft,
        ..ContentDraft::default()
    };

    let services = [
        (
            text("Property sales", "بيع العقارات", "Vente de biens"),
            text(
                "Valuation, marketing and negotiation for sellers.",
                "التقييم والتسويق والتفاوض للبائعين.",
                "Estimation, commercialisation et négociation pour les vendeurs.",
            ),
        ),
        (
            text("Rental management", "إدارة الكراء", "Gestion locative"),
            text(
                "Tenant search, contracts and rent collection.",
                "البحث عن المستأجرين والعقود وتحصيل الإيجار.",
                "Recherche de locataires, baux et encaissement des loyers.",
            ),
        ),
    ];

    let steps = [
        text("Tell us what you need", "أخبرنا بما تحتاجه", "Dites-nous ce qu'il vous faut"),
        text("Visit shortlisted homes", "زر المنازل المختارة", "Visitez la sélection"),
        text("Sign with a notary", "وقّع لدى الموثق", "Signez chez le notaire"),
    ];

    let faqs = [
        (
            text(
                "Can foreigners buy property?",
                "هل يمكن للأجانب شراء العقارات؟",
                "Les étrangers peuvent-ils acheter ?",
            ),
            text(
                "Yes. Urban property can be bought freely through a notary.",
                "نعم. يمكن شراء العقارات الحضرية بحرية عن طريق موثق.",
                "Oui. Les biens urbains s'achètent librement chez un notaire.",
            ),
        ),
        (
            text(
                "What fees should I budget for?",
                "ما هي الرسوم التي يجب توقعها؟",
                "Quels frais prévoir ?",
            ),
            text(
                "Plan for roughly 6 to 7 percent of the price in taxes and notary fees.",
                "خصص حوالي 6 إلى 7 بالمئة من الثمن للضرائب وأتعاب الموثق.",
                "Prévoyez environ 6 à 7 % du prix en taxes et frais de notaire.",
            ),
        ),
    ];

    let mut drafts = vec![
        (ContentKind::Blog, buying_guide),
        (ContentKind::Blog, market),
        (ContentKind::Blog, draft_post),
    ];
    drafts.extend(services.into_iter().enumerate().map(|(index, (title, excerpt))| {
        let mut draft = published(title, excerpt, MultilingualValue::default());
        draft.order = index as i32 + 1;
        (ContentKind::Service, draft)
    }));
    drafts.extend(steps.into_iter().enumerate().map(|(index, title)| {
        let mut draft = published(
            title,
            MultilingualValue::default(),
            MultilingualValue::default(),
        );
        draft.order = index as i32 + 1;
        (ContentKind::Process, draft)
    }));
    drafts.extend(faqs.into_iter().enumerate().map(|(index, (question, answer))| {
        let mut draft = published(question, MultilingualValue::default(), answer);
        draft.order = index as i32 + 1;
        (ContentKind::Faq, draft)
    }));
    drafts
}
