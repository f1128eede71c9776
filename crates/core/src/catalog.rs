//! Hero catalog: the static, hand-curated list every draw is made from.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::role::{Role, RoleSet};

/// Image shown whenever a hero's own portrait cannot be loaded.
pub const FALLBACK_IMAGE_URL: &str = "https://game.gtimg.cn/images/yxzj/img201605/hero/face/166.jpg";

const ICON_BASE: &str = "https://game.gtimg.cn/images/yxzj/img201605/hero/face";

/// A catalog entry. The name is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub name: String,
    pub roles: RoleSet,
    pub image_url: String,
}

impl Hero {
    pub fn new(name: impl Into<String>, roles: &[Role], image_url: impl Into<String>) -> Self {
        Hero {
            name: name.into(),
            roles: roles.iter().copied().collect(),
            image_url: image_url.into(),
        }
    }

    pub fn plays(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// The URL a renderer should display, given whether the primary image failed.
    pub fn image_url_or_fallback(&self, load_failed: bool) -> &str {
        if load_failed || self.image_url.trim().is_empty() {
            FALLBACK_IMAGE_URL
        } else {
            &self.image_url
        }
    }
}

/// Validated, immutable list of heroes in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    heroes: Vec<Hero>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate names and heroes without roles.
    pub fn new(heroes: Vec<Hero>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for hero in &heroes {
            if hero.roles.is_empty() {
                return Err(Error::HeroWithoutRoles(hero.name.clone()));
            }
            if !seen.insert(hero.name.as_str()) {
                return Err(Error::DuplicateHero(hero.name.clone()));
            }
        }
        Ok(Catalog { heroes })
    }

    /// The built-in hero list, built once per process.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| Catalog {
            heroes: builtin_heroes(),
        })
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Heroes playing `role` (any role when `None`) whose name contains `search`.
    pub fn browse<'a>(&'a self, role: Option<Role>, search: &'a str) -> impl Iterator<Item = &'a Hero> {
        let search = search.trim();
        self.heroes.iter().filter(move |h| {
            role.map_or(true, |r| h.plays(r)) && (search.is_empty() || h.name.contains(search))
        })
    }
}

fn icon(id: u32) -> String {
    format!("{}/{}.jpg", ICON_BASE, id)
}

fn hero(name: &str, roles: &[Role], icon_id: u32) -> Hero {
    Hero::new(name, roles, icon(icon_id))
}

fn builtin_heroes() -> Vec<Hero> {
    use Role::*;

    vec![
        // Recent releases
        hero("大禹", &[Top], 101),
        hero("空空儿", &[Jungle], 102),
        hero("元流之子(辅助)", &[Support], 103),
        hero("影", &[Jungle, Top], 574),
        hero("少司缘", &[Support], 564),
        hero("大司命", &[Jungle], 566),
        hero("敖隐", &[Adc], 582),
        hero("海诺", &[Mid], 560),
        hero("朵莉亚", &[Support], 559),
        hero("亚连", &[Top], 542),
        hero("姬小满", &[Top, Jungle], 529),
        hero("赵怀真", &[Jungle, Top], 543),
        hero("暃", &[Jungle], 542),
        hero("戈娅", &[Adc], 540),
        hero("桑启", &[Support], 531),
        hero("金蝉", &[Mid], 536),
        hero("司空震", &[Top, Mid], 537),
        hero("夏洛特", &[Top], 534),
        hero("镜", &[Jungle], 531),
        // Top
        hero("亚瑟", &[Top], 166),
        hero("吕布", &[Top], 123),
        hero("花木兰", &[Top], 154),
        hero("铠", &[Top, Jungle], 193),
        hero("李信", &[Top], 507),
        hero("孙策", &[Top, Jungle], 510),
        hero("曜", &[Top, Jungle], 522),
        hero("狂铁", &[Top], 503),
        // Adc
        hero("鲁班七号", &[Adc], 112),
        hero("孙尚香", &[Adc], 111),
        hero("马可波罗", &[Adc], 132),
        hero("狄仁杰", &[Adc], 133),
        hero("后羿", &[Adc], 169),
        hero("公孙离", &[Adc], 199),
        hero("百里守约", &[Adc, Mid], 196),
        hero("伽罗", &[Adc], 508),
        // Mid
        hero("诸葛亮", &[Mid, Jungle], 190),
        hero("貂蝉", &[Mid], 141),
        hero("妲己", &[Mid], 109),
        hero("安琪拉", &[Mid], 142),
        hero("王昭君", &[Mid], 152),
        hero("小乔", &[Mid], 106),
        hero("不知火舞", &[Mid], 157),
        hero("上官婉儿", &[Mid], 513),
        // Jungle
        hero("李白", &[Jungle], 131),
        hero("韩信", &[Jungle], 150),
        hero("孙悟空", &[Jungle], 167),
        hero("赵云", &[Jungle], 107),
        hero("澜", &[Jungle], 528),
        hero("裴擒虎", &[Jungle], 502),
        // Support
        hero("瑶", &[Support], 505),
        hero("蔡文姬", &[Support], 184),
        hero("大乔", &[Support], 191),
        hero("张飞", &[Support], 171),
        hero("鲁班大师", &[Support], 525),
    ]
}
