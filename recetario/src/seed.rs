//! Demo catalog inserted into an empty store

use recetario_common::{Category, Ingredient, Recipe};

/// Prefix of the bundled demo image references
pub const DEMO_IMAGE_PREFIX: &str = "asset://recetario/drawable/";

fn image(name: &str) -> String {
    format!("{DEMO_IMAGE_PREFIX}{name}")
}

fn ing(qty: f32, unit: &str, name: &str) -> Ingredient {
    Ingredient::new(qty, unit, name)
}

fn demo(
    name: &str,
    category: Category,
    ingredients: Vec<Ingredient>,
    steps: &[&str],
    image_name: &str,
    (calories, protein, cook_time): (i32, i32, i32),
) -> Recipe {
    Recipe::new(name, category)
        .with_ingredients(ingredients)
        .with_steps(steps.join("\n"))
        .with_image(image(image_name))
        .with_nutrition(calories, protein, cook_time)
}

/// The 21 demo recipes, in insertion order
pub fn demo_recipes() -> Vec<Recipe> {
    use Category::*;

    vec![
        demo(
            "Tostadas Francesas",
            Breakfast,
            vec![
                ing(2.0, "", "rebanadas de pan"),
                ing(1.0, "", "huevo"),
                ing(60.0, "ml", "leche"),
                ing(0.5, "cdta", "canela"),
                ing(0.5, "cdta", "vainilla"),
            ],
            &[
                "1. Batir huevo, leche, canela y vainilla.",
                "2. Remojar el pan 10 s por cada lado.",
                "3. Dorar a fuego medio 2 min por lado y servir.",
            ],
            "french_toast",
            (350, 12, 10),
        ),
        demo(
            "Omelette de Espinacas",
            Breakfast,
            vec![
                ing(2.0, "", "huevos"),
                ing(0.5, "taza", "espinacas frescas"),
                ing(20.0, "g", "queso rallado"),
                ing(1.0, "pizca", "sal"),
                ing(1.0, "pizca", "pimienta"),
            ],
            &[
                "1. Batir los huevos con sal y pimienta.",
                "2. Verter en una sartén caliente ligeramente engrasada.",
                "3. Añadir espinacas y queso; plegar el omelette y cocinar 2 min.",
            ],
            "omelette",
            (240, 15, 8),
        ),
        demo(
            "Pancakes de Avena",
            Breakfast,
            vec![
                ing(1.0, "taza", "avena molida"),
                ing(0.5, "taza", "leche"),
                ing(1.0, "", "huevo"),
                ing(1.0, "cdta", "polvo de hornear"),
                ing(1.0, "cda", "miel (opcional)"),
            ],
            &[
                "1. Mezclar avena, polvo de hornear y una pizca de sal.",
                "2. Incorporar leche y huevo hasta obtener una masa homogénea.",
                "3. Cocinar porciones de ¼ taza en sartén antiadherente, 2 min por lado.",
            ],
            "oat_pancakes",
            (310, 13, 15),
        ),
        demo(
            "Smoothie Bowl Tropical",
            Breakfast,
            vec![
                ing(1.0, "", "banana madura congelada"),
                ing(0.5, "taza", "mango congelado"),
                ing(0.5, "taza", "piña congelada"),
                ing(0.25, "taza", "leche de coco"),
                ing(2.0, "cda", "granola (topping)"),
                ing(1.0, "cda", "coco rallado (topping)"),
            ],
            &[
                "1. Licuar banana, mango, piña y leche de coco hasta lograr consistencia espesa.",
                "2. Servir en un bowl; decorar con granola y coco rallado.",
            ],
            "smoothie_bowl",
            (280, 6, 5),
        ),
        demo(
            "Spaghetti al Pesto",
            Lunch,
            vec![
                ing(100.0, "g", "spaghetti"),
                ing(2.0, "cda", "salsa pesto"),
                ing(10.0, "g", "queso parmesano rallado"),
                ing(1.0, "pizca", "sal"),
                ing(1.0, "pizca", "pimienta"),
            ],
            &[
                "1. Cocer la pasta en agua con sal; escurrir.",
                "2. Mezclar con el pesto y el parmesano; rectificar sal y pimienta.",
            ],
            "pesto",
            (520, 14, 20),
        ),
        demo(
            "Ensalada César con Pollo",
            Lunch,
            vec![
                ing(2.0, "taza", "lechuga romana troceada"),
                ing(100.0, "g", "pechuga de pollo a la parrilla"),
                ing(20.0, "g", "crutones"),
                ing(15.0, "g", "queso parmesano rallado"),
                ing(2.0, "cda", "aderezo César"),
            ],
            &[
                "1. Mezclar lechuga y aderezo.",
                "2. Añadir pollo en tiras, crutones y parmesano.",
                "3. Servir de inmediato.",
            ],
            "chicken_caesar",
            (430, 32, 15),
        ),
        demo(
            "Burrito de Frijoles",
            Lunch,
            vec![
                ing(1.0, "", "tortilla grande de harina"),
                ing(80.0, "g", "frijoles negros cocidos"),
                ing(50.0, "g", "arroz cocido"),
                ing(20.0, "g", "queso rallado"),
                ing(30.0, "g", "salsa (pico de gallo)"),
            ],
            &[
                "1. Calentar la tortilla; colocar frijoles y arroz al centro.",
                "2. Añadir queso y salsa; enrollar formando burrito.",
                "3. Dorar ligeramente en sartén si se desea.",
            ],
            "bean_burrito",
            (460, 18, 12),
        ),
        demo(
            "Ensalada de Quinoa",
            Lunch,
            vec![
                ing(0.5, "taza", "quinoa cocida"),
                ing(0.5, "taza", "tomates cherry en mitades"),
                ing(0.25, "taza", "pepino en cubos"),
                ing(30.0, "g", "queso feta desmenuzado"),
                ing(1.0, "cda", "vinagreta ligera"),
            ],
            &[
                "1. Mezclar quinoa, tomates y pepino.",
                "2. Añadir feta y vinagreta; refrigerar 10 min y servir.",
            ],
            "quinoa_salad",
            (390, 13, 25),
        ),
        demo(
            "Pollo al Curry",
            Dinner,
            vec![
                ing(150.0, "g", "pechuga de pollo en cubos"),
                ing(1.0, "cda", "aceite"),
                ing(1.0, "cda", "polvo de curry"),
                ing(100.0, "ml", "leche de coco"),
                ing(1.0, "pizca", "sal"),
            ],
            &[
                "1. Sofreír pollo en aceite hasta dorar.",
                "2. Añadir curry; cocinar 1 min.",
                "3. Verter leche de coco y sal; hervir suave 10 min.",
            ],
            "chicken_curry",
            (540, 35, 18),
        ),
        demo(
            "Salmón al Horno",
            Dinner,
            vec![
                ing(150.0, "g", "filete de salmón"),
                ing(1.0, "cda", "aceite de oliva"),
                ing(1.0, "", "rodaja de limón"),
                ing(1.0, "pizca", "sal"),
                ing(1.0, "pizca", "pimienta"),
            ],
            &[
                "1. Precalentar horno a 200 °C.",
                "2. Colocar el salmón en bandeja, sazonar y rociar aceite.",
                "3. Hornear 12-15 min; servir con la rodaja de limón.",
            ],
            "baked_salmon",
            (480, 34, 15),
        ),
        demo(
            "Lasaña de Verduras",
            Dinner,
            vec![
                ing(3.0, "láminas", "pasta para lasaña precocida"),
                ing(100.0, "g", "zucchini en cubos"),
                ing(100.0, "g", "espinacas"),
                ing(200.0, "ml", "salsa de tomate"),
                ing(80.0, "g", "mozzarella rallada"),
            ],
            &[
                "1. Montar capas de pasta, verduras salteadas y salsa.",
                "2. Cubrir con mozzarella; hornear 25-30 min a 180 °C.",
                "3. Dejar reposar 5 min antes de cortar.",
            ],
            "veggie_lasagna",
            (620, 25, 40),
        ),
        demo(
            "Brownies Clásicos",
            Dessert,
            vec![
                ing(100.0, "g", "mantequilla"),
                ing(120.0, "g", "chocolate negro"),
                ing(80.0, "g", "harina de trigo"),
                ing(150.0, "g", "azúcar"),
                ing(2.0, "", "huevos"),
            ],
            &[
                "1. Derretir mantequilla y chocolate; templar.",
                "2. Añadir azúcar y huevos; mezclar.",
                "3. Incorporar harina; hornear 25-30 min a 175 °C.",
            ],
            "brownies",
            (420, 6, 30),
        ),
        demo(
            "Galletas de Avena",
            Dessert,
            vec![
                ing(1.0, "taza", "avena en hojuelas"),
                ing(0.5, "taza", "harina"),
                ing(0.5, "taza", "azúcar moreno"),
                ing(80.0, "g", "mantequilla"),
                ing(1.0, "", "huevo"),
            ],
            &[
                "1. Cremar mantequilla con azúcar; añadir huevo.",
                "2. Incorporar avena y harina.",
                "3. Formar galletas y hornear 12-15 min a 180 °C.",
            ],
            "oat_cookies",
            (95, 2, 20),
        ),
        demo(
            "Cheesecake de Fresa",
            Dessert,
            vec![
                ing(200.0, "g", "queso crema"),
                ing(50.0, "g", "azúcar"),
                ing(1.0, "", "huevo"),
                ing(80.0, "g", "base de galleta triturada"),
                ing(100.0, "g", "fresas frescas"),
            ],
            &[
                "1. Mezclar queso crema, azúcar y huevo.",
                "2. Verter sobre base de galleta en molde.",
                "3. Hornear 15 min a 180 °C; enfriar y cubrir con fresas.",
            ],
            "strawberry_cheesecake",
            (380, 7, 15),
        ),
        demo(
            "Crema de Calabaza",
            Dinner,
            vec![
                ing(300.0, "g", "calabaza"),
                ing(0.5, "ud", "cebolla"),
                ing(500.0, "ml", "caldo vegetal"),
                ing(1.0, "cda", "nata"),
                ing(1.0, "pizca", "sal y pimienta"),
            ],
            &[
                "1. Sofreír la cebolla; añadir calabaza y caldo.",
                "2. Cocer 20 min y licuar.",
                "3. Devolver a la olla, añadir nata y rectificar sal.",
            ],
            "pumpkin_soup",
            (170, 3, 25),
        ),
        demo(
            "Bolitas Energéticas de Avena",
            Snack,
            vec![
                ing(80.0, "g", "avena"),
                ing(60.0, "g", "mantequilla de maní"),
                ing(30.0, "g", "miel"),
                ing(20.0, "g", "proteína en polvo sabor vainilla"),
                ing(20.0, "g", "semillas de chía"),
            ],
            &[
                "1. Mezclar todos los ingredientes en un bowl grande.",
                "2. Formar bolitas con las manos.",
                "3. Refrigerar 30 min para que compacten.",
            ],
            "bolitas",
            (110, 5, 10),
        ),
        demo(
            "Barra de Cereal Saludable",
            Snack,
            vec![
                ing(1.0, "taza", "avena en hojuelas"),
                ing(0.5, "taza", "frutos secos picados (nueces, almendras)"),
                ing(0.25, "taza", "semillas (chía, lino)"),
                ing(0.5, "taza", "miel o jarabe de arce"),
                ing(0.25, "taza", "chocolate negro troceado (opcional)"),
            ],
            &[
                "1. Combinar avena, frutos secos y semillas en un bowl.",
                "2. Calentar la miel (o jarabe) ligeramente y añadir a la mezcla.",
                "3. Incorporar el chocolate troceado si se usa.",
                "4. Presionar la mezcla firmemente en un molde forrado con papel de horno.",
                "5. Refrigerar por al menos 1 hora antes de cortar en barras.",
            ],
            "barra_cereal",
            (180, 4, 15),
        ),
        demo(
            "Vaso de Yogur con Frutas y Granola",
            Snack,
            vec![
                ing(150.0, "g", "yogur griego natural"),
                ing(0.5, "taza", "fresas frescas en rodajas"),
                ing(0.25, "taza", "arándanos"),
                ing(30.0, "g", "granola"),
                ing(1.0, "cda", "semillas de chía (opcional)"),
            ],
            &[
                "1. En un vaso o bowl, colocar una capa de yogur.",
                "2. Añadir una capa de fresas y arándanos.",
                "3. Cubrir con una capa de granola y semillas de chía.",
                "4. Repetir las capas si el recipiente lo permite.",
                "5. Servir inmediatamente o refrigerar hasta el momento de consumir.",
            ],
            "yogurt_fresa",
            (250, 15, 5),
        ),
        demo(
            "Jugo de Mango y Maracuyá",
            Beverage,
            vec![
                ing(1.0, "ud", "mango maduro"),
                ing(1.0, "ud", "maracuyá (pulpa)"),
                ing(200.0, "ml", "agua fría"),
                ing(2.0, "cda", "azúcar (opcional)"),
                ing(4.0, "cubos", "hielo"),
            ],
            &[
                "1. Pelar y trocear el mango.",
                "2. Extraer la pulpa del maracuyá.",
                "3. Licuar mango, maracuyá, agua y azúcar.",
                "4. Servir con hielo.",
            ],
            "mango_maracuya",
            (120, 1, 5),
        ),
        demo(
            "Limonada Refrescante",
            Beverage,
            vec![
                ing(3.0, "ud", "limones grandes"),
                ing(1.0, "litro", "agua fría"),
                ing(100.0, "g", "azúcar (o al gusto)"),
                ing(6.0, "rodaja", "hojas de menta (opcional)"),
                ing(4.0, "cubos", "hielo"),
            ],
            &[
                "1. Exprimir el jugo de los limones.",
                "2. En una jarra, mezclar el jugo de limón, agua y azúcar hasta disolver.",
                "3. Añadir rodajas de limón y hojas de menta si se desea.",
                "4. Servir con hielo.",
            ],
            "limonada",
            (80, 0, 5),
        ),
        demo(
            "Té Helado de Durazno",
            Beverage,
            vec![
                ing(2.0, "bolsitas", "té negro"),
                ing(500.0, "ml", "agua caliente"),
                ing(1.0, "ud", "durazno maduro en rodajas"),
                ing(50.0, "g", "azúcar (o al gusto)"),
                ing(4.0, "cubos", "hielo"),
            ],
            &[
                "1. Preparar el té negro con el agua caliente; dejar infusionar 5 minutos.",
                "2. Retirar las bolsitas de té y añadir el azúcar, revolviendo hasta disolver.",
                "3. Incorporar las rodajas de durazno.",
                "4. Dejar enfriar completamente y luego refrigerar.",
                "5. Servir bien frío con hielo.",
            ],
            "te_helado_durazno",
            (90, 0, 10),
        ),
    ]
}
