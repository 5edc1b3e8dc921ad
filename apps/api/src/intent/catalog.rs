//! Slot catalog — the single source of truth for every per-domain slot.
//!
//! Three tables feed it: slot specs (key, question, keyword pattern), coverage
//! weights, and question priorities. The weight tables stay separate so tuning
//! question order never shifts intent scores. `SlotCatalog::from_tables` joins
//! them and refuses to build if a key is missing from either weight table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::ScoringError;
use crate::models::domain::Domain;

// ────────────────────────────────────────────────────────────────────────────
// Keyword patterns (lower-case alternations, matched against lower-cased text)
// ────────────────────────────────────────────────────────────────────────────

const SUBJECT_PATTERN: &str = "인물|사람|여자|남자|소녀|소년|아이|고양이|강아지|동물|풍경|건물|캐릭터|제품|음식|꽃|자동차|주인공|피사체|portrait|person|woman|girl|boy|cat|dog|animal|landscape|character|product|subject";
const STYLE_PATTERN: &str = "스타일|화풍|수채화|유화|애니메이션|애니|일러스트|실사|사실적|포토리얼|픽셀아트|3d|카툰|미니멀|빈티지|사이버펑크|시네마틱|style|watercolor|anime|illustration|photorealistic|realistic|cartoon|minimal|vintage|cinematic";
const ASPECT_RATIO_PATTERN: &str = "비율|16:9|9:16|4:3|3:2|1:1|정사각|가로형|세로형|해상도|4k|1080p|ratio|aspect|square|resolution";
/// Shared by `rights` (image) and `use_rights` (video).
const RIGHTS_PATTERN: &str = "상업|라이선스|라이센스|저작권|권리|사용권|개인용|commercial|license|licence|copyright|rights|royalty";

const COMPOSITION_PATTERN: &str = "구도|클로즈업|전신|상반신|배경|정면|측면|로우앵글|하이앵글|구성|close-up|closeup|full body|background|composition";
const LIGHTING_PATTERN: &str = "조명|빛|햇살|역광|노을|야경|그림자|자연광|lighting|sunlight|shadow|backlight|golden hour";
const COLOR_PALETTE_PATTERN: &str = "색감|색상|컬러|파스텔|흑백|모노톤|비비드|톤|colou?r|palette|pastel|monochrome|vivid";

const DURATION_PATTERN: &str = r"\d+\s*(?:초|분|secs?|seconds?|mins?|minutes?)|길이|러닝타임|분량|duration|length";
const CAMERA_MOTION_PATTERN: &str = "카메라|촬영|패닝|줌|트래킹|드론|핸드헬드|앵글|슬로우모션|camera|panning|zoom|tracking|drone|handheld|slow motion|dolly";
const AUDIO_PATTERN: &str = "음악|배경음|bgm|효과음|사운드|내레이션|나레이션|목소리|무음|audio|music|sound|narration|voice";

const DEV_TYPE_PATTERN: &str = "웹|앱|모바일|api|서버|cli|데스크톱|라이브러리|봇|대시보드|web|app|mobile|backend|desktop|library|bot|dashboard|website";
const CORE_FEATURES_PATTERN: &str = "기능|검색|결제|채팅|업로드|게시판|알림|예약|장바구니|crud|features?|search|payment|chat|upload|notification|booking|cart";
const TARGET_USERS_PATTERN: &str = "대상|타겟|고객|사용자층|회원|관리자용|학생|직장인|기업용|b2b|b2c|user base|target|audience|customers|clients";
const TECH_PREF_PATTERN: &str = "rust|python|java|typescript|node|react|vue|spring|django|fastapi|golang|postgres|mysql|mongodb|aws|docker|kubernetes|기술 스택|스택|프레임워크|언어|데이터베이스|stack|framework|language|database";
const SECURITY_AUTH_PATTERN: &str = "인증|로그인|권한|보안|암호화|토큰|세션|2fa|oauth|jwt|auth|login|security|encryption|permission";
const PRIORITY_PATTERN: &str = "우선순위|우선|먼저|급해|급함|마감|일정|mvp|중요|priority|deadline|asap|urgent";

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

/// Static description of one slot, before weights are attached.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub key: &'static str,
    pub question: &'static str,
    pub pattern: &'static str,
}

const fn spec(key: &'static str, question: &'static str, pattern: &'static str) -> SlotSpec {
    SlotSpec {
        key,
        question,
        pattern,
    }
}

const IMAGE_SLOTS: &[SlotSpec] = &[
    spec("subject", "무엇을 그리고 싶으신가요? 주요 피사체(인물, 동물, 사물 등)를 알려주세요.", SUBJECT_PATTERN),
    spec("style", "원하는 스타일이나 화풍이 있나요? (예: 수채화, 실사, 애니메이션)", STYLE_PATTERN),
    spec("composition", "구도는 어떻게 할까요? (예: 클로즈업, 전신, 배경 포함 여부)", COMPOSITION_PATTERN),
    spec("lighting", "조명이나 빛의 분위기는 어떤가요? (예: 자연광, 역광, 노을)", LIGHTING_PATTERN),
    spec("color_palette", "선호하는 색감이 있나요? (예: 파스텔, 흑백, 비비드)", COLOR_PALETTE_PATTERN),
    spec("aspect_ratio", "이미지 비율이나 해상도는 어떻게 할까요? (예: 16:9, 1:1)", ASPECT_RATIO_PATTERN),
    spec("rights", "상업적으로 사용할 예정인가요? 사용 권리 조건을 알려주세요.", RIGHTS_PATTERN),
];

const VIDEO_SLOTS: &[SlotSpec] = &[
    spec("subject", "영상의 주인공이나 핵심 장면은 무엇인가요?", SUBJECT_PATTERN),
    spec("duration", "영상 길이는 얼마나 되나요? (예: 15초, 1분)", DURATION_PATTERN),
    spec("style", "영상 스타일은 어떻게 할까요? (예: 실사, 애니메이션, 시네마틱)", STYLE_PATTERN),
    spec("camera_motion", "카메라 움직임이나 촬영 기법이 있나요? (예: 드론, 줌, 트래킹)", CAMERA_MOTION_PATTERN),
    spec("audio", "배경음악이나 내레이션이 필요한가요?", AUDIO_PATTERN),
    spec("aspect_ratio", "화면 비율은 어떻게 할까요? (예: 16:9, 9:16)", ASPECT_RATIO_PATTERN),
    spec("use_rights", "상업적 사용 여부와 라이선스 조건을 알려주세요.", RIGHTS_PATTERN),
];

const DEV_SLOTS: &[SlotSpec] = &[
    spec("type", "어떤 종류의 결과물을 원하시나요? (예: 웹, 모바일 앱, API, CLI)", DEV_TYPE_PATTERN),
    spec("core_features", "꼭 필요한 핵심 기능은 무엇인가요?", CORE_FEATURES_PATTERN),
    spec("target_users", "주요 대상 사용자층은 누구인가요?", TARGET_USERS_PATTERN),
    spec("tech_pref_constraints", "선호하는 기술 스택이나 제약 조건이 있나요? (예: 언어, 프레임워크, 데이터베이스)", TECH_PREF_PATTERN),
    spec("security_auth", "인증이나 보안 요구사항이 있나요? (예: 로그인, 권한 관리)", SECURITY_AUTH_PATTERN),
    spec("priority", "가장 먼저 완성해야 하는 우선순위나 일정이 있나요?", PRIORITY_PATTERN),
];

/// Coverage weights used by intent scoring.
const COVERAGE_WEIGHTS: &[(Domain, &[(&str, u32)])] = &[
    (
        Domain::Image,
        &[
            ("subject", 25),
            ("style", 20),
            ("composition", 15),
            ("lighting", 10),
            ("color_palette", 10),
            ("aspect_ratio", 10),
            ("rights", 10),
        ],
    ),
    (
        Domain::Video,
        &[
            ("subject", 20),
            ("duration", 20),
            ("style", 15),
            ("camera_motion", 15),
            ("audio", 10),
            ("aspect_ratio", 10),
            ("use_rights", 10),
        ],
    ),
    (
        Domain::Dev,
        &[
            ("type", 20),
            ("core_features", 22),
            ("target_users", 16),
            ("tech_pref_constraints", 18),
            ("security_auth", 12),
            ("priority", 12),
        ],
    ),
];

/// Question priorities used by the selector. Higher is asked first.
const QUESTION_PRIORITIES: &[(Domain, &[(&str, u32)])] = &[
    (
        Domain::Image,
        &[
            ("subject", 10),
            ("style", 9),
            ("aspect_ratio", 7),
            ("composition", 6),
            ("lighting", 5),
            ("color_palette", 4),
            ("rights", 3),
        ],
    ),
    (
        Domain::Video,
        &[
            ("subject", 10),
            ("duration", 9),
            ("style", 8),
            ("camera_motion", 6),
            ("aspect_ratio", 5),
            ("audio", 4),
            ("use_rights", 3),
        ],
    ),
    (
        Domain::Dev,
        &[
            ("type", 10),
            ("core_features", 9),
            ("tech_pref_constraints", 8),
            ("target_users", 7),
            ("priority", 6),
            ("security_auth", 5),
        ],
    ),
];

const SLOT_SPECS: &[(Domain, &[SlotSpec])] = &[
    (Domain::Image, IMAGE_SLOTS),
    (Domain::Video, VIDEO_SLOTS),
    (Domain::Dev, DEV_SLOTS),
];

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

/// A fully resolved slot: spec plus both weights.
#[derive(Debug, Clone, Serialize)]
pub struct SlotDefinition {
    pub key: &'static str,
    pub question: &'static str,
    /// Coverage weight for intent scoring.
    pub weight: u32,
    /// Ordering weight for follow-up questions.
    pub priority: u32,
    pub required: bool,
    #[serde(skip)]
    pub pattern: &'static str,
}

#[derive(Debug, Clone)]
pub struct SlotCatalog {
    domains: BTreeMap<Domain, Vec<SlotDefinition>>,
}

impl SlotCatalog {
    /// The built-in image/video/dev rule set.
    pub fn builtin() -> Result<Self, ScoringError> {
        Self::from_tables(SLOT_SPECS, COVERAGE_WEIGHTS, QUESTION_PRIORITIES)
    }

    pub fn from_tables(
        specs: &[(Domain, &[SlotSpec])],
        coverage: &[(Domain, &[(&str, u32)])],
        priorities: &[(Domain, &[(&str, u32)])],
    ) -> Result<Self, ScoringError> {
        let mut domains = BTreeMap::new();
        let mut patterns: BTreeMap<&str, &str> = BTreeMap::new();

        for (domain, slot_specs) in specs {
            let mut slots = Vec::with_capacity(slot_specs.len());
            for s in slot_specs.iter() {
                let weight = lookup_weight(coverage, *domain, s.key).ok_or_else(|| {
                    ScoringError::MissingWeight {
                        table: "coverage",
                        domain: *domain,
                        key: s.key.to_string(),
                    }
                })?;
                let priority = lookup_weight(priorities, *domain, s.key).ok_or_else(|| {
                    ScoringError::MissingWeight {
                        table: "priority",
                        domain: *domain,
                        key: s.key.to_string(),
                    }
                })?;
                if weight == 0 {
                    return Err(ScoringError::ZeroWeight {
                        domain: *domain,
                        key: s.key.to_string(),
                    });
                }
                if slots.iter().any(|existing: &SlotDefinition| existing.key == s.key) {
                    return Err(ScoringError::DuplicateSlot {
                        domain: *domain,
                        key: s.key.to_string(),
                    });
                }
                // A key reused across domains must mean the same thing lexically.
                match patterns.get(s.key) {
                    Some(existing) if *existing != s.pattern => {
                        return Err(ScoringError::PatternConflict {
                            key: s.key.to_string(),
                        });
                    }
                    _ => {
                        patterns.insert(s.key, s.pattern);
                    }
                }
                slots.push(SlotDefinition {
                    key: s.key,
                    question: s.question,
                    weight,
                    priority,
                    required: true,
                    pattern: s.pattern,
                });
            }
            domains.insert(*domain, slots);
        }

        Ok(Self { domains })
    }

    /// Ordered slot list for a domain.
    pub fn slots_for(&self, domain: Domain) -> &[SlotDefinition] {
        self.domains
            .get(&domain)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display question for a key. Never fails: unknown keys get a templated question.
    pub fn question_for(&self, key: &str) -> String {
        self.domains
            .values()
            .flatten()
            .find(|slot| slot.key == key)
            .map(|slot| slot.question.to_string())
            .unwrap_or_else(|| fallback_question(key))
    }

    /// Every distinct (key, pattern) pair across all domains, in first-seen order.
    pub fn keyword_patterns(&self) -> Vec<(&'static str, &'static str)> {
        let mut seen: Vec<(&'static str, &'static str)> = Vec::new();
        for slot in self.domains.values().flatten() {
            if !seen.iter().any(|(key, _)| *key == slot.key) {
                seen.push((slot.key, slot.pattern));
            }
        }
        seen
    }

    pub fn domains(&self) -> impl Iterator<Item = Domain> + '_ {
        self.domains.keys().copied()
    }
}

pub fn fallback_question(key: &str) -> String {
    format!("{key}에 대해 더 자세히 알려주세요.")
}

fn lookup_weight(table: &[(Domain, &[(&str, u32)])], domain: Domain, key: &str) -> Option<u32> {
    table
        .iter()
        .find(|(d, _)| *d == domain)
        .and_then(|(_, weights)| weights.iter().find(|(k, _)| *k == key))
        .map(|(_, w)| *w)
}
